//! Integration tests for `SerpApiClient` using wiremock HTTP mocks.

use std::time::Duration;

use partfinder_search::{HttpSettings, SearchError, SearchOptions, SearchProvider, SerpApiClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(max_retries: u32) -> HttpSettings {
    HttpSettings {
        max_retries,
        backoff_base_secs: 0,
        ..HttpSettings::default()
    }
}

fn test_client(base_url: &str) -> SerpApiClient {
    SerpApiClient::with_base_url(Some("test-key"), &settings(0), base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn search_sends_expected_params_and_parses_results() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "search_metadata": { "status": "Success" },
        "organic_results": [
            {
                "position": 1,
                "title": "Motorcraft Brake Pad Set",
                "link": "https://www.rockauto.com/en/moreinfo.php?pk=1",
                "rich_snippet": {
                    "top": {
                        "detected_extensions": { "price": 42.99, "rating": 4.7, "reviews": 311 },
                        "extensions": ["$42.99", "In stock"]
                    }
                }
            },
            {
                "position": 2,
                "title": "Brake Pads - Ceramic",
                "link": "https://www.autozone.com/brakes/p/2",
                "price": "$35.49"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("engine", "google"))
        .and(query_param("q", "\"brake pads\" site:rockauto.com"))
        .and(query_param("location", "United States"))
        .and(query_param("gl", "us"))
        .and(query_param("hl", "en"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let results = client
        .search("\"brake pads\" site:rockauto.com", &SearchOptions::default())
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title.as_deref(), Some("Motorcraft Brake Pad Set"));
    assert_eq!(results[0].price_text().as_deref(), Some("$42.99"));
    assert_eq!(results[0].reviews(), Some(311));
    assert_eq!(results[1].price_text().as_deref(), Some("$35.49"));
}

#[tokio::test]
async fn missing_organic_results_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "search_metadata": { "status": "Success" } })),
        )
        .mount(&server)
        .await;

    let results = test_client(&server.uri())
        .search("oil filter", &SearchOptions::default())
        .await
        .expect("search should succeed");
    assert!(results.is_empty());
}

#[tokio::test]
async fn no_results_error_payload_is_empty_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Google hasn't returned any results for this query."
        })))
        .mount(&server)
        .await;

    let results = test_client(&server.uri())
        .search("\"obscure part\" site:rockauto.com", &SearchOptions::default())
        .await
        .expect("no-results payload should not be an error");
    assert!(results.is_empty());
}

#[tokio::test]
async fn api_error_payload_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "Invalid API key." })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search("oil filter", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Provider(ref msg) if msg == "Invalid API key."));
}

#[tokio::test]
async fn rate_limit_is_typed_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search("oil filter", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::RateLimited {
            retry_after_secs: 7
        }
    ));
}

#[tokio::test]
async fn server_error_status_is_unexpected_status_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search("oil filter", &SearchOptions::default())
        .await
        .unwrap_err();
    match err {
        SearchError::UnexpectedStatus { status, url } => {
            assert_eq!(status, 502);
            assert!(!url.contains("test-key"), "url leaks key: {url}");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search("oil filter", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Deserialize { .. }));
}

#[tokio::test]
async fn rate_limit_is_retried_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "organic_results": [{ "title": "Oil Filter", "link": "https://www.napaonline.com/f" }]
        })))
        .mount(&server)
        .await;

    let client = SerpApiClient::with_base_url(Some("test-key"), &settings(2), &server.uri())
        .expect("client construction should not fail");
    let results = client
        .search("oil filter", &SearchOptions::default())
        .await
        .expect("retry should recover");
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn unconfigured_client_never_calls_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = SerpApiClient::with_base_url(None, &settings(0), &server.uri())
        .expect("client construction should not fail");
    assert!(!client.is_configured());
    let err = client
        .search("oil filter", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::NotConfigured));
}

#[tokio::test]
async fn network_error_does_not_leak_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "organic_results": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let http = HttpSettings {
        request_timeout_secs: 1,
        ..settings(0)
    };
    let client = SerpApiClient::with_base_url(Some("SECRET-KEY-123"), &http, &server.uri())
        .expect("client construction should not fail");
    let err = client
        .search("brake pads", &SearchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Http(_)), "got: {err:?}");
    assert!(!err.to_string().contains("SECRET-KEY-123"), "leaked: {err}");
    assert!(!format!("{err:?}").contains("SECRET-KEY-123"), "leaked: {err:?}");
}
