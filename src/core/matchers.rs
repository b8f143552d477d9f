//! Ordered keyword rule tables.
//!
//! Both tables are evaluated top to bottom against already-normalised text and the
//! first satisfied rule wins, so table order is part of the behaviour.

/// Trigger predicate over normalised text.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    Contains(&'static str),
    AnyOf(&'static [&'static str]),
    AllOf(&'static [Trigger]),
}

impl Trigger {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Contains(needle) => text.contains(needle),
            Trigger::AnyOf(needles) => needles.iter().any(|needle| text.contains(needle)),
            Trigger::AllOf(triggers) => triggers.iter().all(|trigger| trigger.matches(text)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DomainRule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub response: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct GenericRule {
    pub keyword: &'static str,
    pub response: &'static str,
}

pub const LOAN_APPLICATION_RESPONSE: &str = "💡 **Applying for a New Loan:**\n\
You can apply for a new loan through our mobile app, by visiting any bank branch, \
or by calling our dedicated loan department at **1800-200-5000**. \
You will need a valid ID proof and income documents.";

pub const BRANCH_LISTING_RESPONSE: &str = "🌎 **Bank Locations (Sample Data):**\n\
Our main branches are located in the City Center, North End, and 7th Ave. \
Please visit our official website for a complete, up-to-date list of all locations.";

pub const SUPPORT_CONTACT_RESPONSE: &str = "☎️ **Customer Care Details:**\n\
Our 24/7 customer care number is **1800-111-222**. \
For fraud reporting, please call **1800-444-999** immediately.";

pub const GREETING_RESPONSE: &str = "Hello there! I'm your Bank Assistant, ready to help with account queries or general banking information.";

pub const GRATITUDE_RESPONSE: &str =
    "You're very welcome! Is there anything else I can assist you with today?";

pub const SUPPORT_ESCALATION_RESPONSE: &str = "For immediate support, please call our 24/7 care line or specify your issue (e.g., 'fraud report').";

pub static DOMAIN_RULES: &[DomainRule] = &[
    DomainRule {
        name: "loan_application",
        trigger: Trigger::AllOf(&[Trigger::Contains("loan"), Trigger::AnyOf(&["apply", "new"])]),
        response: LOAN_APPLICATION_RESPONSE,
    },
    DomainRule {
        name: "branch_listing",
        trigger: Trigger::AnyOf(&["location", "branch", "available"]),
        response: BRANCH_LISTING_RESPONSE,
    },
    DomainRule {
        name: "support_contact",
        trigger: Trigger::AnyOf(&["customer care", "number", "contact"]),
        response: SUPPORT_CONTACT_RESPONSE,
    },
];

pub static GENERIC_RULES: &[GenericRule] = &[
    GenericRule {
        keyword: "hello",
        response: GREETING_RESPONSE,
    },
    GenericRule {
        keyword: "thank you",
        response: GRATITUDE_RESPONSE,
    },
    GenericRule {
        keyword: "support",
        response: SUPPORT_ESCALATION_RESPONSE,
    },
];

/// Lower-case, trim, and collapse inner whitespace runs to a single space.
pub fn normalize(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordMatchers {
    domain: &'static [DomainRule],
    generic: &'static [GenericRule],
}

impl Default for KeywordMatchers {
    fn default() -> Self {
        Self::new(DOMAIN_RULES, GENERIC_RULES)
    }
}

impl KeywordMatchers {
    pub fn new(domain: &'static [DomainRule], generic: &'static [GenericRule]) -> Self {
        Self { domain, generic }
    }

    pub fn match_domain(&self, normalized: &str) -> Option<&'static str> {
        self.domain
            .iter()
            .find(|rule| rule.trigger.matches(normalized))
            .map(|rule| {
                tracing::trace!("domain rule '{}' matched", rule.name);
                rule.response
            })
    }

    pub fn match_generic(&self, normalized: &str) -> Option<&'static str> {
        self.generic
            .iter()
            .find(|rule| normalized.contains(rule.keyword))
            .map(|rule| rule.response)
    }
}
