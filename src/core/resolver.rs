use crate::core::fallback::GenerativeFallback;
use crate::core::matchers::{normalize, KeywordMatchers};
use crate::domain::model::{AccountContext, Resolution, Stage};

/// Turns a user utterance into exactly one response.
///
/// Stages run in order and the first hit is final:
/// domain keywords, generic keywords, then the generative fallback.
/// Holds no per-request state, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ResponseResolver {
    matchers: KeywordMatchers,
    fallback: GenerativeFallback,
}

impl ResponseResolver {
    pub fn new(matchers: KeywordMatchers, fallback: GenerativeFallback) -> Self {
        Self { matchers, fallback }
    }

    pub fn with_fallback(fallback: GenerativeFallback) -> Self {
        Self::new(KeywordMatchers::default(), fallback)
    }

    pub fn generative_available(&self) -> bool {
        self.fallback.is_available()
    }

    /// Callers must reject empty queries first.
    pub async fn resolve(&self, query: &str, context: Option<&AccountContext>) -> Resolution {
        let normalized = normalize(query);

        if let Some(response) = self.matchers.match_domain(&normalized) {
            tracing::debug!(stage = %Stage::DomainKeyword, "Query resolved");
            return Resolution::new(response, Stage::DomainKeyword);
        }

        if let Some(response) = self.matchers.match_generic(&normalized) {
            tracing::debug!(stage = %Stage::GenericKeyword, "Query resolved");
            return Resolution::new(response, Stage::GenericKeyword);
        }

        let resolution = self.fallback.respond(query, context).await;
        tracing::debug!(stage = %resolution.stage, "Query resolved");
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallback::OFFLINE_RESPONSE;
    use crate::core::matchers::{GREETING_RESPONSE, LOAN_APPLICATION_RESPONSE};
    use crate::domain::ports::{BackendError, GenerativeBackend};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeBackend for CountingBackend {
        async fn generate(
            &self,
            _instruction: &str,
            query: &str,
        ) -> std::result::Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {}", query))
        }
    }

    #[tokio::test]
    async fn test_domain_rule_wins_over_backend() {
        let backend = Arc::new(CountingBackend::default());
        let resolver = ResponseResolver::with_fallback(GenerativeFallback::new(Some(backend.clone())));

        let result = resolver.resolve("How do I apply for a new loan?", None).await;
        assert_eq!(result.response, LOAN_APPLICATION_RESPONSE);
        assert_eq!(result.stage, Stage::DomainKeyword);
        assert!(result.response.contains("1800-200-5000"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generic_rule_uses_normalized_text() {
        let resolver = ResponseResolver::with_fallback(GenerativeFallback::unavailable());
        let result = resolver.resolve("   HeLLo   ", None).await;
        assert_eq!(result.response, GREETING_RESPONSE);
        assert_eq!(result.stage, Stage::GenericKeyword);
    }

    #[tokio::test]
    async fn test_no_match_without_backend_is_offline() {
        let resolver = ResponseResolver::with_fallback(GenerativeFallback::unavailable());
        assert!(!resolver.generative_available());

        let result = resolver.resolve("What's the weather today?", None).await;
        assert_eq!(result.response, OFFLINE_RESPONSE);
        assert_eq!(result.stage, Stage::GenerativeUnavailable);
    }

    #[tokio::test]
    async fn test_fallback_keeps_original_casing() {
        let backend = Arc::new(CountingBackend::default());
        let resolver = ResponseResolver::with_fallback(GenerativeFallback::new(Some(backend.clone())));

        let result = resolver.resolve("  What's The Weather?", None).await;
        assert_eq!(result.response, "echo:   What's The Weather?");
        assert_eq!(result.stage, Stage::Generative);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let backend = Arc::new(CountingBackend::default());
        let resolver = ResponseResolver::with_fallback(GenerativeFallback::new(Some(backend.clone())));

        let first = resolver.resolve("random question", None).await;
        let second = resolver.resolve("random question", None).await;
        assert_eq!(first, second);
        // no caching between calls
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }
}
