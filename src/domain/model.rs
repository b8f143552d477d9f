use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_ACTIVE_LOANS: &str = "No Active Loans";
pub const NOT_AVAILABLE: &str = "N/A";

/// Snapshot of an authenticated user's account, used to personalise generative answers.
///
/// Every field may be absent. The resolver only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountContext {
    pub holder_name: Option<String>,
    pub account_no: Option<String>,
    pub account_type: Option<String>,
    pub branch_name: Option<String>,
    pub loan_status: Option<String>,
    pub loan_end_date: Option<String>,
}

/// Row of the account store, keyed by mobile number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub mobile_number: String,
    pub holder_name: String,
    pub account_no: String,
    pub branch_name: String,
    pub account_type: String,
    pub loan_status: Option<String>,
    pub end_date: Option<NaiveDate>,
}

/// Account view returned by login / account lookups, with display defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    pub holder_name: String,
    pub account_no: String,
    pub branch_name: String,
    pub account_type: String,
    pub loan_status: String,
    pub loan_end_date: String,
}

impl AccountDetails {
    pub fn from_record(record: AccountRecord) -> Self {
        Self {
            mobile_number: None,
            holder_name: record.holder_name,
            account_no: record.account_no,
            branch_name: record.branch_name,
            account_type: record.account_type,
            loan_status: record
                .loan_status
                .filter(|status| !status.trim().is_empty())
                .unwrap_or_else(|| NO_ACTIVE_LOANS.to_string()),
            loan_end_date: record
                .end_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    pub fn with_mobile_number(mut self, mobile_number: impl Into<String>) -> Self {
        self.mobile_number = Some(mobile_number.into());
        self
    }

    pub fn to_context(&self) -> AccountContext {
        AccountContext {
            holder_name: Some(self.holder_name.clone()),
            account_no: Some(self.account_no.clone()),
            account_type: Some(self.account_type.clone()),
            branch_name: Some(self.branch_name.clone()),
            loan_status: Some(self.loan_status.clone()),
            loan_end_date: Some(self.loan_end_date.clone()),
        }
    }
}

/// Pipeline stage that produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DomainKeyword,
    GenericKeyword,
    Generative,
    GenerativeUnavailable,
    GenerativeError,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::DomainKeyword => "domain_keyword",
            Stage::GenericKeyword => "generic_keyword",
            Stage::Generative => "generative",
            Stage::GenerativeUnavailable => "generative_unavailable",
            Stage::GenerativeError => "generative_error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub response: String,
    pub stage: Stage,
}

impl Resolution {
    pub fn new(response: impl Into<String>, stage: Stage) -> Self {
        Self {
            response: response.into(),
            stage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub llm_available: bool,
    pub service: String,
}
