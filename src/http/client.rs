use chrono::Utc;
use log::{debug, info};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;

use super::request::HttpRequest;
use crate::core::config::ScraperConfig;
use crate::{ScraperError, ScraperResult, StatsTracker};

/// Shared HTTP client for the static-page sources.
///
/// Every call is a single attempt; a non-2xx status is an error.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    stats: Arc<StatsTracker>,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> ScraperResult<Self> {
        let client = ClientBuilder::new()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ScraperError::transport("<client>", e))?;

        Ok(Self {
            client,
            stats: Arc::new(StatsTracker::new()),
        })
    }

    pub fn with_stats(mut self, stats: Arc<StatsTracker>) -> Self {
        self.stats = stats;
        self
    }

    pub fn stats(&self) -> &StatsTracker {
        &self.stats
    }

    /// Fetches a page and returns its body text.
    pub async fn fetch(&self, request: HttpRequest) -> ScraperResult<String> {
        let url = request.url.clone();
        let mut req = self.client.request(request.method, request.url);
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        info!("Fetching URL: {}", url);
        let start_time = Utc::now();

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                self.stats.record_failed_request();
                return Err(ScraperError::transport(&url, e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.stats.record_failed_request();
            return Err(ScraperError::transport(&url, format!("HTTP status {}", status)));
        }

        let body = response.text().await.map_err(|e| {
            self.stats.record_failed_request();
            ScraperError::transport(&url, e)
        })?;

        let duration = Utc::now().signed_duration_since(start_time);
        debug!(
            "Received response: status={}, body_length={}, elapsed={}ms",
            status.as_u16(),
            body.len(),
            duration.num_milliseconds()
        );
        self.stats.record_request(body.len(), duration);

        Ok(body)
    }

    pub async fn get(&self, url: &str) -> ScraperResult<String> {
        self.fetch(HttpRequest::get(url)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::ErrorKind;
    use reqwest::Method;
    use std::time::Duration;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (HttpClient, MockServer) {
        let server = MockServer::start().await;
        let client = HttpClient::new(&ScraperConfig::default()).unwrap();
        (client, server)
    }

    #[tokio::test]
    async fn test_get_request() {
        let (client, mock_server) = setup().await;

        Mock::given(method("GET"))
            .and(path("/detail"))
            .and(header("user-agent", crate::core::config::DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&mock_server)
            .await;

        let body = client
            .get(&format!("{}/detail", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(body, "<html>ok</html>");
        assert_eq!(client.stats().get_stats().total_requests, 1);
    }

    #[tokio::test]
    async fn test_configured_user_agent() {
        let server = MockServer::start().await;
        let config = ScraperConfig::default().with_user_agent("county-audit/2.0");
        let client = HttpClient::new(&config).unwrap();

        Mock::given(method("GET"))
            .and(header("user-agent", "county-audit/2.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client.get(&server.uri()).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_post_request() {
        let (client, mock_server) = setup().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_string("parcel=1"))
            .respond_with(ResponseTemplate::new(201).set_body_string("created"))
            .mount(&mock_server)
            .await;

        let request = HttpRequest::get(&format!("{}/search", mock_server.uri()))
            .unwrap()
            .with_method(Method::POST)
            .with_header("content-type", "application/x-www-form-urlencoded")
            .with_body("parcel=1");
        let body = client.fetch(request).await.unwrap();

        assert_eq!(body, "created");
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let (client, mock_server) = setup().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let err = client
            .get(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().contains("404"));
        assert_eq!(client.stats().get_stats().failed_requests, 1);
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        let config = ScraperConfig::default().with_request_timeout(Duration::from_millis(100));
        let client = HttpClient::new(&config).unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = client.get(&server.uri()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let (client, _server) = setup().await;
        let err = client.get("not a url").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
