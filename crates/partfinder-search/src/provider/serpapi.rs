//! [`SearchProvider`] backed by the SerpApi Google search endpoint.

use reqwest::{Client, Url};

use super::{SearchOptions, SearchProvider};
use crate::error::SearchError;
use crate::http::{parse_base_url, HttpSettings};
use crate::rate_limit::retry_with_backoff;
use crate::types::{parse_organic_results, RawSearchResult, SerpApiResponse};

const DEFAULT_BASE_URL: &str = "https://serpapi.com/";

/// SerpApi reports an empty result page through the `error` field with a 200.
const NO_RESULTS_MARKER: &str = "hasn't returned any results";

/// Client for `GET /search` on SerpApi.
///
/// Constructed without an API key it reports itself unconfigured and every
/// search fails with [`SearchError::NotConfigured`].
pub struct SerpApiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl SerpApiClient {
    /// Creates a client pointed at the production SerpApi host.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: Option<&str>, settings: &HttpSettings) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom host (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = settings.build_client()?;
        let endpoint = parse_base_url(base_url)
            .and_then(|base| base.join("search").map_err(|e| e.to_string()))
            .map_err(|reason| SearchError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason,
            })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            endpoint,
            max_retries: settings.max_retries,
            backoff_base_secs: settings.backoff_base_secs,
        })
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, api_key: &str, query: &str, options: &SearchOptions) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("engine", &options.engine)
            .append_pair("q", query)
            .append_pair("location", &options.location)
            .append_pair("gl", &options.country)
            .append_pair("hl", &options.language)
            .append_pair("num", &options.result_count.to_string());
        url
    }

    async fn request_once(&self, url: Url) -> Result<Vec<RawSearchResult>, SearchError> {
        // reqwest errors carry the request URL, which holds the API key.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Http(e.without_url()))?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(SearchError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            // The endpoint URL carries no query string, so the key is not leaked.
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Http(e.without_url()))?;
        let parsed: SerpApiResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: "SerpApi search response".to_owned(),
                source: e,
            })?;

        if let Some(message) = parsed.error {
            if message.contains(NO_RESULTS_MARKER) {
                return Ok(Vec::new());
            }
            return Err(SearchError::Provider(message));
        }

        Ok(parse_organic_results(parsed.organic_results))
    }
}

impl SearchProvider for SerpApiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<RawSearchResult>, SearchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SearchError::NotConfigured);
        };
        let url = self.build_url(api_key, query, options);
        tracing::debug!(query, engine = %options.engine, "querying SerpApi");

        let results = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.request_once(url.clone())
        })
        .await?;

        tracing::debug!(query, count = results.len(), "SerpApi returned results");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SerpApiClient {
        SerpApiClient::with_base_url(Some("test-key"), &HttpSettings::default(), base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_query_string() {
        let client = test_client("https://serpapi.com");
        let url = client.build_url("test-key", "oil filter", &SearchOptions::default());
        assert_eq!(
            url.as_str(),
            "https://serpapi.com/search?api_key=test-key&engine=google&q=oil+filter\
             &location=United+States&gl=us&hl=en&num=10"
        );
    }

    #[test]
    fn build_url_encodes_site_filters_and_quotes() {
        let client = test_client("https://serpapi.com/");
        let url = client.build_url(
            "test-key",
            "\"brake pads\" site:rockauto.com OR site:autozone.com",
            &SearchOptions::default(),
        );
        assert!(
            url.as_str()
                .contains("q=%22brake+pads%22+site%3Arockauto.com+OR+site%3Aautozone.com"),
            "unexpected encoding: {url}"
        );
    }

    #[test]
    fn blank_key_is_unconfigured() {
        let client =
            SerpApiClient::with_base_url(Some("  "), &HttpSettings::default(), DEFAULT_BASE_URL)
                .unwrap();
        assert!(!client.is_configured());
        assert!(test_client(DEFAULT_BASE_URL).is_configured());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result =
            SerpApiClient::with_base_url(Some("k"), &HttpSettings::default(), "not a url");
        assert!(matches!(result, Err(SearchError::InvalidBaseUrl { .. })));
    }
}
