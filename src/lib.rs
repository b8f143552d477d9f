pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{CsvAccountStore, GeminiClient};
pub use self::core::{
    assistant::BankAssistant, fallback::GenerativeFallback, matchers::KeywordMatchers,
    resolver::ResponseResolver,
};
pub use domain::model::{AccountContext, AccountDetails, Resolution, Stage};
pub use utils::error::{AssistError, Result};
