//! Shared `reqwest` client construction for outbound API calls.

use std::time::Duration;

use partfinder_core::AppConfig;
use reqwest::Client;

/// Timeouts, identification, and retry policy for an outbound API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure, for retriable errors only.
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 3,
            request_timeout_secs: 10,
            user_agent: "partfinder/0.1 (auto-parts-search)".to_owned(),
            max_retries: 0,
            backoff_base_secs: 1,
        }
    }
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            connect_timeout_secs: config.connect_timeout_secs,
            request_timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.provider_max_retries,
            backoff_base_secs: config.provider_backoff_base_secs,
        }
    }

    pub(crate) fn build_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .user_agent(&self.user_agent)
            .build()
    }
}

/// Parses `base_url`, normalized to end in exactly one slash so relative
/// joins append to it rather than replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<reqwest::Url, String> {
    let normalized = format!("{}/", base_url.trim_end_matches('/'));
    reqwest::Url::parse(&normalized).map_err(|e| e.to_string())
}
