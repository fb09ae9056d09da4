use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("upstream error {status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error("response decode error: {0}")]
    Decode(reqwest::Error),
}
