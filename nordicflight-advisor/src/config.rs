use std::{env, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AdvisorConfig {
    /// Reads the `GEMINI_*` variables; `API_KEY` is accepted as a fallback key.
    pub fn from_env() -> Self {
        Self {
            api_key: api_key(),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: request_timeout(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

fn api_key() -> Option<String> {
    env::var("GEMINI_API_KEY")
        .or_else(|_| env::var("API_KEY"))
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn request_timeout() -> Duration {
    let millis = env::var("GEMINI_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        let config = AdvisorConfig::default().with_base_url("http://127.0.0.1:9000/v1beta/");
        assert_eq!(
            config.endpoint(),
            "http://127.0.0.1:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn default_has_no_key() {
        let config = AdvisorConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(15));
    }
}
