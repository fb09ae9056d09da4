//! One-shot generative-text risk summaries for the operations console.
//!
//! Every request is a single attempt. Whatever goes wrong (no key, transport,
//! upstream status, undecodable body) the caller gets the console's fallback
//! text instead of an error.

pub mod client;
pub mod config;
pub mod error;

use nordicflight_core::{RiskSnapshot, summary_or_fallback};
use tracing::info;

pub use client::GeminiClient;
pub use config::AdvisorConfig;
pub use error::AdvisorError;

#[derive(Debug, Clone)]
pub struct RiskAdvisor {
    config: AdvisorConfig,
}

impl RiskAdvisor {
    pub fn new(config: AdvisorConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(AdvisorConfig::from_env())
    }

    pub async fn analyze(&self, snapshot: &RiskSnapshot<'_>) -> Result<String, AdvisorError> {
        let client = GeminiClient::new(self.config.clone())?;
        client.generate(&snapshot.prompt()).await
    }

    /// Text for the console: the generated summary or a fixed fallback.
    pub async fn summarize(&self, snapshot: &RiskSnapshot<'_>) -> String {
        let summary = summary_or_fallback(self.analyze(snapshot).await);
        info!(chars = summary.len(), "risk summary ready");
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nordicflight_core::Fixtures;

    #[tokio::test]
    async fn analyze_reports_typed_errors() {
        let fixtures = Fixtures::load_default().unwrap();
        let snapshot = RiskSnapshot::new(&fixtures.drones, &fixtures.weather, &fixtures.alerts);
        let config = AdvisorConfig::default().with_base_url("http://127.0.0.1:9");
        let advisor = RiskAdvisor::new(config);

        assert!(matches!(
            advisor.analyze(&snapshot).await,
            Err(AdvisorError::MissingApiKey)
        ));
    }
}
