use serde::Deserialize;
use thiserror::Error;

/// Top-level body of the chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<EndpointError>,
}

/// Error object the endpoint embeds in `chart.error`
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointError {
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteSeries>,
}

/// Daily bars; the endpoint reports `null` for days without trading data
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSeries {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResponse {
    /// The first quote series of the first result, as the endpoint nests it
    pub fn quote_series(&self) -> Result<&QuoteSeries, ApiError> {
        if let Some(err) = &self.chart.error {
            return Err(ApiError::Endpoint {
                code: err.code.clone(),
                description: err.description.clone().unwrap_or_default(),
            });
        }

        let result = self
            .chart
            .result
            .as_ref()
            .and_then(|results| results.first())
            .ok_or_else(|| ApiError::MalformedResponse("chart.result is empty".to_string()))?;

        result
            .indicators
            .quote
            .first()
            .ok_or_else(|| ApiError::MalformedResponse("indicators.quote is empty".to_string()))
    }
}

/// Error type for quote API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The requested name is not one of the known sources
    #[error("Unsupported source '{0}'")]
    UnsupportedSource(String),
    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
    /// Network/request error
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Non-success HTTP status
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// The endpoint answered with an error object
    #[error("Endpoint Error ({code}): {description}")]
    Endpoint { code: String, description: String },
    /// The body parsed but lacks the expected structure
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// Deserialization error
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nullable_bars() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {
                        "quote": [{
                            "open": [189.1, 190.0, null],
                            "close": [189.7, null, 191.2],
                            "volume": [51000000, 48000000, null]
                        }],
                        "adjclose": [{"adjclose": [189.7, null, 191.2]}]
                    }
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let series = response.quote_series().unwrap();
        assert_eq!(series.close, vec![Some(189.7), None, Some(191.2)]);
        assert_eq!(series.volume, vec![Some(51_000_000.0), Some(48_000_000.0), None]);
    }

    #[test]
    fn test_endpoint_error_is_reported() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        match response.quote_series() {
            Err(ApiError::Endpoint { code, description }) => {
                assert_eq!(code, "Not Found");
                assert!(description.contains("delisted"));
            }
            other => panic!("expected endpoint error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_quote_is_malformed() {
        let body = r#"{"chart": {"result": [{"indicators": {"quote": []}}], "error": null}}"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            response.quote_series(),
            Err(ApiError::MalformedResponse(_))
        ));
    }
}
