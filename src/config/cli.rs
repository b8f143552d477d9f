use crate::adapters::gemini::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::config::toml_config::MAX_TIMEOUT_SECONDS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "bank-assist")]
#[command(about = "Bank assistant: account lookup and question answering")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of the flags below
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true, default_value = "./accounts.csv")]
    pub accounts: String,

    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub gemini_api_url: String,

    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Per-request bound on query resolution
    #[arg(long, global = true, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Ask the assistant a question
    Ask {
        query: String,

        /// Log in first and personalise answers with this account
        #[arg(long)]
        mobile: Option<String>,

        /// Also print which stage produced the answer
        #[arg(long)]
        show_stage: bool,
    },
    /// Verify a mobile number and print the account
    Login { mobile: String },
    /// Print account details for a mobile number
    Account { mobile: String },
    /// Print static bank information
    Info {
        #[arg(value_enum)]
        topic: InfoTopic,
    },
    /// Print service health
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InfoTopic {
    Loans,
    Branches,
    Contact,
}

impl ConfigProvider for CliConfig {
    fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn gemini_api_url(&self) -> &str {
        &self.gemini_api_url
    }

    fn gemini_model(&self) -> &str {
        &self.gemini_model
    }

    fn accounts_path(&self) -> &str {
        &self.accounts
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("--gemini-api-url", &self.gemini_api_url)?;
        validate_non_empty_string("--gemini-model", &self.gemini_model)?;
        validate_path("--accounts", &self.accounts)?;
        validate_file_extension("--accounts", &self.accounts, &["csv"])?;
        validate_range("--timeout-seconds", self.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;
        Ok(())
    }
}
