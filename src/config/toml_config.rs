use crate::adapters::gemini::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::core::ConfigProvider;
use crate::utils::error::{AssistError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ACCOUNTS_PATH: &str = "./accounts.csv";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsConfig {
    pub path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssistError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AssistError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AssistError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn gemini_api_key(&self) -> Option<&str> {
        // an unresolved ${VAR} placeholder means the variable was not set
        self.gemini
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    fn gemini_api_url(&self) -> &str {
        self.gemini.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn gemini_model(&self) -> &str {
        self.gemini.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn accounts_path(&self) -> &str {
        self.accounts.path.as_deref().unwrap_or(DEFAULT_ACCOUNTS_PATH)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.service
            .request_timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("gemini.api_url", self.gemini_api_url())?;
        validate_non_empty_string("gemini.model", self.gemini_model())?;
        validate_path("accounts.path", self.accounts_path())?;
        validate_file_extension("accounts.path", self.accounts_path(), &["csv"])?;
        validate_range(
            "service.request_timeout_seconds",
            self.request_timeout_seconds(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
request_timeout_seconds = 12

[gemini]
api_key = "abc123"
api_url = "http://localhost:8080/v1beta"
model = "gemini-2.0-flash"

[accounts]
path = "data/accounts.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.gemini_api_key(), Some("abc123"));
        assert_eq!(config.gemini_api_url(), "http://localhost:8080/v1beta");
        assert_eq!(config.gemini_model(), "gemini-2.0-flash");
        assert_eq!(config.accounts_path(), "data/accounts.csv");
        assert_eq!(config.request_timeout_seconds(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.gemini_api_key(), None);
        assert_eq!(config.gemini_api_url(), DEFAULT_API_URL);
        assert_eq!(config.gemini_model(), DEFAULT_MODEL);
        assert_eq!(config.accounts_path(), DEFAULT_ACCOUNTS_PATH);
        assert_eq!(config.request_timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BANK_ASSIST_TEST_KEY", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[gemini]
api_key = "${BANK_ASSIST_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.gemini_api_key(), Some("from-env"));

        std::env::remove_var("BANK_ASSIST_TEST_KEY");
    }

    #[test]
    fn test_unset_env_var_means_no_key() {
        let config = TomlConfig::from_toml_str(
            r#"
[gemini]
api_key = "${BANK_ASSIST_SURELY_UNSET_VAR}"
"#,
        )
        .unwrap();
        assert_eq!(config.gemini_api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[gemini]\napi_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_timeout =
            TomlConfig::from_toml_str("[service]\nrequest_timeout_seconds = 0\n").unwrap();
        assert!(bad_timeout.validate().is_err());

        let bad_path = TomlConfig::from_toml_str("[accounts]\npath = \"accounts.xlsx\"\n").unwrap();
        assert!(bad_path.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[gemini\nmodel = 1").unwrap_err();
        assert!(matches!(err, AssistError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[accounts]\npath = \"fixtures/accounts.csv\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.accounts_path(), "fixtures/accounts.csv");
    }
}
