use serde::{Deserialize, Serialize};

pub const LOAN_DEPARTMENT_NUMBER: &str = "1800-200-5000";
pub const CUSTOMER_CARE_NUMBER: &str = "1800-111-222";
pub const FRAUD_REPORTING_NUMBER: &str = "1800-444-999";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInfo {
    pub title: String,
    pub description: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub title: String,
    pub branches: Vec<Branch>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub title: String,
    pub customer_care: String,
    pub fraud_reporting: String,
    pub description: String,
}

pub fn loan_info() -> LoanInfo {
    LoanInfo {
        title: "Applying for a New Loan".to_string(),
        description: format!(
            "You can apply for a new loan through our mobile app, by visiting any bank branch, \
or by calling our dedicated loan department at {}. \
You will need a valid ID proof and income documents.",
            LOAN_DEPARTMENT_NUMBER
        ),
        contact: LOAN_DEPARTMENT_NUMBER.to_string(),
    }
}

pub fn branch_info() -> BranchInfo {
    let branches = ["City Center", "North End", "7th Ave"]
        .into_iter()
        .map(|location| Branch {
            name: format!("{} Branch", location),
            location: location.to_string(),
        })
        .collect();

    BranchInfo {
        title: "Bank Locations".to_string(),
        branches,
        note: "Please visit our official website for a complete, up-to-date list of all locations."
            .to_string(),
    }
}

pub fn contact_info() -> ContactInfo {
    ContactInfo {
        title: "Customer Care Details".to_string(),
        customer_care: CUSTOMER_CARE_NUMBER.to_string(),
        fraud_reporting: FRAUD_REPORTING_NUMBER.to_string(),
        description: "Our 24/7 customer care number is available for all your queries. \
For fraud reporting, please call our dedicated fraud line immediately."
            .to_string(),
    }
}
