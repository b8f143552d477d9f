use crate::domain::model::AccountRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a generative backend call.
///
/// `Api` carries detail the backend meant to be shown; `Unexpected` is everything else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend API error: {0}")]
    Api(String),

    #[error("unexpected backend failure: {0}")]
    Unexpected(String),
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        query: &str,
    ) -> std::result::Result<String, BackendError>;
}

pub trait AccountStore: Send + Sync {
    fn find_by_mobile(
        &self,
        mobile_number: &str,
    ) -> impl std::future::Future<Output = Result<Option<AccountRecord>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn gemini_api_key(&self) -> Option<&str>;
    fn gemini_api_url(&self) -> &str;
    fn gemini_model(&self) -> &str;
    fn accounts_path(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
}
