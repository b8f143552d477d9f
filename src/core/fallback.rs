use crate::domain::model::{AccountContext, Resolution, Stage, NOT_AVAILABLE};
use crate::domain::ports::{BackendError, GenerativeBackend};
use std::sync::Arc;

pub const PERSONA_PREAMBLE: &str = "You are a helpful and professional bank assistant. \
If the query is not bank-related, answer it professionally and briefly.";

pub const OFFLINE_RESPONSE: &str = "⚠️ My advanced AI services are currently offline. \
I can only handle specific bank keywords or private account lookups.";

pub const UNEXPECTED_ERROR_RESPONSE: &str =
    "❌ An unexpected error occurred while contacting the AI service.";

pub fn api_error_response(detail: &str) -> String {
    format!(
        "❌ LLM API Error: The advanced AI service is temporarily unavailable. Error: {}",
        detail
    )
}

/// 組合 persona 指令；有登入資訊時附加帳戶區塊
pub fn build_instruction(context: Option<&AccountContext>) -> String {
    let mut instruction = PERSONA_PREAMBLE.to_string();

    if let Some(ctx) = context {
        let field = |value: &Option<String>| value.as_deref().unwrap_or(NOT_AVAILABLE).to_string();

        instruction.push_str(&format!(
            "\n\nThe user is currently logged in. Here are their account details:\n\
- Name: {}\n\
- Account Number: {}\n\
- Account Type: {}\n\
- Branch: {}\n\
- Loan Status: {}\n\
- Loan End Date: {}\n\
\nWhen answering queries, use this information to provide personalized responses. \
For example, if they ask about their account, loan status, or branch, use these details. \
Address them by their name when appropriate.",
            field(&ctx.holder_name),
            field(&ctx.account_no),
            field(&ctx.account_type),
            field(&ctx.branch_name),
            field(&ctx.loan_status),
            field(&ctx.loan_end_date),
        ));
    }

    instruction
}

/// Last pipeline stage. Always produces a response; backend failures become error text.
#[derive(Clone)]
pub struct GenerativeFallback {
    backend: Option<Arc<dyn GenerativeBackend>>,
}

impl GenerativeFallback {
    pub fn new(backend: Option<Arc<dyn GenerativeBackend>>) -> Self {
        if backend.is_none() {
            tracing::warn!("Generative backend not configured; AI fallback answers will be offline");
        }
        Self { backend }
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn respond(&self, query: &str, context: Option<&AccountContext>) -> Resolution {
        let Some(backend) = &self.backend else {
            return Resolution::new(OFFLINE_RESPONSE, Stage::GenerativeUnavailable);
        };

        let instruction = build_instruction(context);
        tracing::debug!(
            personalized = context.is_some(),
            "Calling generative backend"
        );

        match backend.generate(&instruction, query).await {
            Ok(text) => Resolution::new(text, Stage::Generative),
            Err(BackendError::Api(detail)) => {
                tracing::warn!("Generative backend API error: {}", detail);
                Resolution::new(api_error_response(&detail), Stage::GenerativeError)
            }
            Err(BackendError::Unexpected(detail)) => {
                tracing::error!("Unexpected generative backend failure: {}", detail);
                Resolution::new(UNEXPECTED_ERROR_RESPONSE, Stage::GenerativeError)
            }
        }
    }
}

impl std::fmt::Debug for GenerativeFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeFallback")
            .field("available", &self.is_available())
            .finish()
    }
}
