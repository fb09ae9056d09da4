use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdvisorConfig;
use crate::error::AdvisorError;

// Wire types for the `generateContent` endpoint, trimmed to the fields we use.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    config: AdvisorConfig,
}

impl GeminiClient {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AdvisorError::Client)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Sends `prompt` once and returns the generated text, possibly empty.
    pub async fn generate(&self, prompt: &str) -> Result<String, AdvisorError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AdvisorError::MissingApiKey)?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let url = self.config.endpoint();
        debug!(%url, model = %self.config.model, "requesting risk analysis");
        let res = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(AdvisorError::Transport)?;
        let status = res.status();

        if !status.is_success() {
            let message = res
                .json::<ErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "no error body".to_string());
            return Err(AdvisorError::Upstream { status, message });
        }

        let payload = res
            .json::<GenerateResponse>()
            .await
            .map_err(AdvisorError::Decode)?;
        Ok(payload.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_parts_of_first_candidate() {
        let payload: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "- RTB EAGLE-03\n"}, {"text": "- hold EAGLE-01"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(payload.text(), "- RTB EAGLE-03\n- hold EAGLE-01");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let payload: GenerateResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert_eq!(payload.text(), "");
    }

    #[test]
    fn request_body_matches_wire_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "status?" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "status?"}]}]})
        );
    }

    #[tokio::test]
    async fn refuses_to_send_without_key() {
        let client = GeminiClient::new(AdvisorConfig::default()).unwrap();
        assert!(matches!(
            client.generate("status?").await,
            Err(AdvisorError::MissingApiKey)
        ));
    }
}
