use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ApiError, ChartResponse};

/// Client for the Yahoo Finance chart endpoint (daily bars, no API key)
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
    timeout_secs: u64,
}

impl YahooClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart";

    const BROWSER_USER_AGENT: &'static str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

    /// Create a client against `base_url`, e.g. a local stub in tests
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .default_headers(Self::create_headers())
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    /// The endpoint rejects requests without a browser-like user agent
    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn map_request_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::RequestError(format!("Request failed: {}", e))
        }
    }

    /// Parse error response based on HTTP status code
    ///
    /// The endpoint usually explains a failure in `chart.error`, prefer that over the raw body.
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let body_text = response.text().await.unwrap_or_default();

        if let Ok(parsed) = serde_json::from_str::<ChartResponse>(&body_text) {
            if let Some(err) = parsed.chart.error {
                warn!("Quote endpoint returned {}: {}", status, err.code);
                return ApiError::Endpoint {
                    code: err.code,
                    description: err.description.unwrap_or_default(),
                };
            }
        }

        warn!("Quote endpoint returned {}: {}", status, body_text);
        ApiError::HttpError(status.as_u16(), body_text)
    }

    /// GET /{symbol}?period1=..&period2=..&interval=1d
    ///
    /// Retrieves daily bars between two unix timestamps (seconds).
    ///
    /// # Returns
    /// * `Ok(ChartResponse)` - Raw chart body, bars may contain nulls
    /// * `Err(ApiError)` - Network, timeout, status or deserialization failure
    pub async fn get_daily_chart(
        &self,
        symbol: &str,
        period1: i64,
        period2: i64,
    ) -> Result<ChartResponse, ApiError> {
        let url = format!("{}/{}", self.base_url, symbol);
        debug!("GET {} period1={} period2={}", url, period1, period2);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body_text = response.text().await.map_err(|e| self.map_request_error(e))?;

        serde_json::from_str::<ChartResponse>(&body_text)
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = YahooClient::with_base_url(
            "http://localhost:9/chart/".to_string(),
            Duration::from_secs(3),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9/chart");
        assert_eq!(client.timeout_secs, 3);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        // Port 9 (discard) is closed on any sane test host
        let client = YahooClient::with_base_url(
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.get_daily_chart("AAPL", 0, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::RequestError(_) | ApiError::Timeout(_)));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_aapl_daily() {
        let client = YahooClient::with_base_url(YahooClient::DEFAULT_BASE_URL.to_string(), Duration::from_secs(10)).unwrap();
        let end = chrono::Utc::now().timestamp();
        let start = end - 30 * 86_400;

        let response = client.get_daily_chart("AAPL", start, end).await.unwrap();
        let series = response.quote_series().unwrap();
        assert!(!series.close.is_empty());
    }
}
