use crate::core::{BackendError, ConfigProvider, GenerativeBackend};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

impl ApiErrorBody {
    fn detail(&self) -> String {
        let head = match (self.code, self.status.as_deref()) {
            (Some(code), Some(status)) => format!("{} {}", code, status),
            (Some(code), None) => code.to_string(),
            (None, Some(status)) => status.to_string(),
            (None, None) => String::new(),
        };
        match (head.is_empty(), self.message.as_deref()) {
            (false, Some(message)) => format!("{}. {}", head, message),
            (true, Some(message)) => message.to_string(),
            (_, None) => head,
        }
    }
}

/// Gemini `generateContent` client.
///
/// No timeout or retry here; the caller bounds each request.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// 沒有 API key 時回傳 None（代表生成式服務未設定）
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Option<Self> {
        let api_key = config
            .gemini_api_key()
            .map(str::trim)
            .filter(|key| !key.is_empty())?;

        Some(Self::new(
            config.gemini_api_url(),
            config.gemini_model(),
            api_key,
        ))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, instruction: &str, query: &str) -> Result<String, BackendError> {
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: instruction }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: query }],
            }],
        };

        tracing::debug!("Sending generateContent request to model {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Unexpected(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.detail())
                .ok()
                .filter(|detail| !detail.is_empty())
                .unwrap_or_else(|| status.to_string());
            return Err(BackendError::Api(detail));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Unexpected(format!("invalid response body: {}", e)))?;

        let text: String = payload
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.is_empty() {
            return Err(BackendError::Unexpected(
                "response contained no candidate text".to_string(),
            ));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_formats() {
        let body = ApiErrorBody {
            code: Some(429),
            message: Some("quota exceeded".to_string()),
            status: Some("RESOURCE_EXHAUSTED".to_string()),
        };
        assert_eq!(body.detail(), "429 RESOURCE_EXHAUSTED. quota exceeded");

        let message_only = ApiErrorBody {
            code: None,
            message: Some("quota exceeded".to_string()),
            status: None,
        };
        assert_eq!(message_only.detail(), "quota exceeded");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:9000/v1beta/", "gemini-2.5-flash", "k");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: "be helpful" }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hi" }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be helpful");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }
}
