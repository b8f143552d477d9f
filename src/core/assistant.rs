use crate::core::resolver::ResponseResolver;
use crate::domain::model::{AccountContext, AccountDetails, HealthStatus, Resolution};
use crate::domain::ports::AccountStore;
use crate::utils::error::{AssistError, Result};
use crate::utils::validation::validate_mobile_number;
use std::time::Duration;

pub const SERVICE_NAME: &str = "Bank Assistant API";

pub fn health_status(llm_available: bool) -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        llm_available,
        service: SERVICE_NAME.to_string(),
    }
}

pub struct BankAssistant<S: AccountStore> {
    store: S,
    resolver: ResponseResolver,
    request_timeout: Duration,
}

impl<S: AccountStore> BankAssistant<S> {
    pub fn new(store: S, resolver: ResponseResolver, request_timeout: Duration) -> Self {
        Self {
            store,
            resolver,
            request_timeout,
        }
    }

    /// 驗證手機號碼並回傳帳戶資料（含手機號碼）
    pub async fn login(&self, mobile_number: &str) -> Result<AccountDetails> {
        let mobile_number = validate_mobile_number(mobile_number)?;
        let details = self.lookup(mobile_number).await?;
        tracing::info!("Login succeeded for account {}", details.account_no);
        Ok(details.with_mobile_number(mobile_number))
    }

    pub async fn account_details(&self, mobile_number: &str) -> Result<AccountDetails> {
        let mobile_number = validate_mobile_number(mobile_number)?;
        self.lookup(mobile_number).await
    }

    async fn lookup(&self, mobile_number: &str) -> Result<AccountDetails> {
        match self.store.find_by_mobile(mobile_number).await {
            Ok(Some(record)) => Ok(AccountDetails::from_record(record)),
            Ok(None) => {
                tracing::info!("No account registered for the given mobile number");
                Err(AssistError::AccountNotFound {
                    mobile_number: mobile_number.to_string(),
                })
            }
            Err(e) => {
                tracing::error!("Account lookup failed: {}", e);
                Err(e)
            }
        }
    }

    /// Answer a free-text query, bounded by the per-request timeout.
    pub async fn ask(&self, query: &str, context: Option<&AccountContext>) -> Result<Resolution> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistError::validation("Query is required"));
        }

        match tokio::time::timeout(self.request_timeout, self.resolver.resolve(query, context)).await {
            Ok(resolution) => Ok(resolution),
            Err(_) => {
                tracing::warn!(
                    "Query resolution timed out after {:.3}s",
                    self.request_timeout.as_secs_f64()
                );
                Err(AssistError::Timeout {
                    millis: self.request_timeout.as_millis() as u64,
                })
            }
        }
    }

    pub fn health(&self) -> HealthStatus {
        health_status(self.resolver.generative_available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallback::GenerativeFallback;
    use crate::domain::model::{AccountRecord, Stage, NO_ACTIVE_LOANS};
    use crate::domain::ports::{BackendError, GenerativeBackend};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct MockStore {
        records: HashMap<String, AccountRecord>,
        fail: bool,
    }

    impl MockStore {
        fn with_account() -> Self {
            let record = AccountRecord {
                mobile_number: "9876543210".to_string(),
                holder_name: "Asha Rao".to_string(),
                account_no: "ACC1001".to_string(),
                branch_name: "City Center".to_string(),
                account_type: "Savings".to_string(),
                loan_status: None,
                end_date: None,
            };
            Self {
                records: HashMap::from([(record.mobile_number.clone(), record)]),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                records: HashMap::new(),
                fail: true,
            }
        }
    }

    impl AccountStore for MockStore {
        async fn find_by_mobile(&self, mobile_number: &str) -> Result<Option<AccountRecord>> {
            if self.fail {
                return Err(AssistError::storage("connection refused"));
            }
            Ok(self.records.get(mobile_number).cloned())
        }
    }

    struct SlowBackend;

    #[async_trait]
    impl GenerativeBackend for SlowBackend {
        async fn generate(
            &self,
            _instruction: &str,
            _query: &str,
        ) -> std::result::Result<String, BackendError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("too late".to_string())
        }
    }

    fn assistant(store: MockStore) -> BankAssistant<MockStore> {
        BankAssistant::new(
            store,
            ResponseResolver::with_fallback(GenerativeFallback::unavailable()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_login_returns_details_with_defaults() {
        let details = assistant(MockStore::with_account())
            .login(" 9876543210 ")
            .await
            .unwrap();
        assert_eq!(details.mobile_number.as_deref(), Some("9876543210"));
        assert_eq!(details.holder_name, "Asha Rao");
        assert_eq!(details.loan_status, NO_ACTIVE_LOANS);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_numbers() {
        let assistant = assistant(MockStore::with_account());
        assert!(matches!(
            assistant.login("12345").await,
            Err(AssistError::ValidationError { .. })
        ));
        assert!(matches!(
            assistant.login("1111111111").await,
            Err(AssistError::AccountNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_account_details_propagates_store_errors() {
        let result = assistant(MockStore::failing()).account_details("9876543210").await;
        assert!(matches!(result, Err(AssistError::StorageError { .. })));
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_query() {
        let result = assistant(MockStore::with_account()).ask("   ", None).await;
        assert!(matches!(result, Err(AssistError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_ask_resolves_keywords() {
        let resolution = assistant(MockStore::with_account())
            .ask("Where is the nearest branch?", None)
            .await
            .unwrap();
        assert_eq!(resolution.stage, Stage::DomainKeyword);
    }

    #[tokio::test]
    async fn test_ask_times_out_on_slow_backend() {
        let assistant = BankAssistant::new(
            MockStore::with_account(),
            ResponseResolver::with_fallback(GenerativeFallback::new(Some(Arc::new(SlowBackend)))),
            Duration::from_millis(50),
        );

        let result = assistant.ask("tell me a story", None).await;
        assert!(matches!(result, Err(AssistError::Timeout { millis: 50 })));
    }

    #[test]
    fn test_health_reports_llm_availability() {
        let health = assistant(MockStore::with_account()).health();
        assert_eq!(health.status, "healthy");
        assert!(!health.llm_available);
        assert_eq!(health.service, SERVICE_NAME);
    }
}
