use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::api::yahoo::{ApiError, QuoteSeries, YahooClient};
use crate::models::{Dataset, StockSource};
use crate::utils::DemandError;

/// Most recent valid trading days kept from a remote load
pub const MAX_REMOTE_DAYS: usize = 15;
/// Fewer valid trading days than this is not enough to fit on
pub const MIN_REMOTE_DAYS: usize = 5;
/// Volumes are reported in thousands of shares
pub const VOLUME_SCALE: f64 = 1000.0;

/// Built-in downward-sloping demand schedule
pub const SAMPLE_PRICES: [f64; 8] = [100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0];
pub const SAMPLE_QUANTITIES: [f64; 8] = [10.0, 15.0, 20.0, 30.0, 40.0, 55.0, 70.0, 90.0];

/// Parse one comma-separated field into finite numbers
pub fn parse_series(field: &'static str, text: &str) -> Result<Vec<f64>, DemandError> {
    text.split(',')
        .map(|token| {
            let token = token.trim();
            match token.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(DemandError::Parse {
                    field,
                    token: token.to_string(),
                }),
            }
        })
        .collect()
}

/// Validate manually entered prices and quantities
///
/// # Returns
/// * `Ok((prices, quantities))` - Equal-length series with at least 2 pairs
/// * `Err(DemandError)` - `Parse`, `ShapeMismatch` or `InsufficientData`
pub fn parse_manual_input(
    prices_text: &str,
    quantities_text: &str,
) -> Result<(Vec<f64>, Vec<f64>), DemandError> {
    let prices = parse_series("prices", prices_text)?;
    let quantities = parse_series("quantities", quantities_text)?;

    if prices.len() != quantities.len() {
        return Err(DemandError::ShapeMismatch {
            prices: prices.len(),
            quantities: quantities.len(),
        });
    }

    if prices.len() < 2 {
        return Err(DemandError::InsufficientData {
            required: 2,
            actual: prices.len(),
        });
    }

    Ok((prices, quantities))
}

/// Parse manual input and replace the dataset with it
pub fn apply_manual_data(
    dataset: &mut Dataset,
    prices_text: &str,
    quantities_text: &str,
) -> Result<usize, DemandError> {
    let (prices, quantities) = parse_manual_input(prices_text, quantities_text).map_err(|e| {
        warn!("Rejected manual input: {}", e);
        e
    })?;

    let count = prices.len();
    dataset.update(prices, quantities)?;
    info!("Applied {} manual observations", count);
    Ok(count)
}

pub fn load_sample_data(dataset: &mut Dataset) -> Result<usize, DemandError> {
    dataset.update(SAMPLE_PRICES.to_vec(), SAMPLE_QUANTITIES.to_vec())?;
    Ok(SAMPLE_PRICES.len())
}

/// Turn daily close/volume bars into (price, volume in thousands) observations
///
/// Days missing either value are dropped, then only the most recent
/// `MAX_REMOTE_DAYS` are kept.
pub fn observations_from_series(series: &QuoteSeries) -> Result<(Vec<f64>, Vec<f64>), DemandError> {
    let valid: Vec<(f64, f64)> = series
        .close
        .iter()
        .zip(series.volume.iter())
        .filter_map(|(close, volume)| match (close, volume) {
            (Some(c), Some(v)) => Some((*c, *v)),
            _ => None,
        })
        .collect();

    let start = valid.len().saturating_sub(MAX_REMOTE_DAYS);
    let recent = &valid[start..];

    debug!(
        "{} bars, {} valid, keeping {}",
        series.close.len(),
        valid.len(),
        recent.len()
    );

    if recent.len() < MIN_REMOTE_DAYS {
        return Err(DemandError::InsufficientData {
            required: MIN_REMOTE_DAYS,
            actual: recent.len(),
        });
    }

    let prices = recent.iter().map(|(close, _)| *close).collect();
    let quantities = recent.iter().map(|(_, volume)| volume / VOLUME_SCALE).collect();
    Ok((prices, quantities))
}

/// Fetch the recent quote window for a named source
pub async fn fetch_api_data(
    client: &YahooClient,
    source_name: &str,
    window_days: i64,
) -> Result<(StockSource, Vec<f64>, Vec<f64>), DemandError> {
    let source = StockSource::lookup(source_name).ok_or_else(|| {
        DemandError::data_source(source_name, ApiError::UnsupportedSource(source_name.to_string()))
    })?;

    let end = Utc::now();
    let start = end - Duration::days(window_days);

    info!("📈 Fetching {} quotes for the last {} days", source, window_days);

    let response = client
        .get_daily_chart(source.symbol(), start.timestamp(), end.timestamp())
        .await
        .map_err(|e| DemandError::data_source(source.name(), e))?;

    let series = response
        .quote_series()
        .map_err(|e| DemandError::data_source(source.name(), e))?;

    let (prices, quantities) = observations_from_series(series)?;
    Ok((source, prices, quantities))
}

/// Fetch a source and replace the dataset; the dataset is untouched on failure
pub async fn load_api_data(
    client: &YahooClient,
    dataset: &mut Dataset,
    source_name: &str,
    window_days: i64,
) -> Result<(StockSource, usize), DemandError> {
    let (source, prices, quantities) = fetch_api_data(client, source_name, window_days)
        .await
        .map_err(|e| {
            warn!("Failed to load {}: {}", source_name, e);
            e
        })?;

    let count = prices.len();
    dataset.update(prices, quantities)?;
    info!("Loaded {} observations for {}", count, source);
    Ok((source, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn series(close: Vec<Option<f64>>, volume: Vec<Option<f64>>) -> QuoteSeries {
        QuoteSeries { close, volume }
    }

    #[test]
    fn test_manual_input_parses_with_spaces() {
        let (prices, quantities) =
            parse_manual_input("10, 15, 20,25 ,30", "100, 85, 72, 60, 50").unwrap();
        assert_eq!(prices, vec![10.0, 15.0, 20.0, 25.0, 30.0]);
        assert_eq!(quantities, vec![100.0, 85.0, 72.0, 60.0, 50.0]);
    }

    #[test]
    fn test_manual_input_rejects_bad_tokens() {
        match parse_manual_input("10, abc, 20", "1, 2, 3") {
            Err(DemandError::Parse { field, token }) => {
                assert_eq!(field, "prices");
                assert_eq!(token, "abc");
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        assert!(matches!(
            parse_manual_input("10, 20", "1, NaN"),
            Err(DemandError::Parse { field: "quantities", .. })
        ));
        assert!(matches!(
            parse_manual_input("10, inf", "1, 2"),
            Err(DemandError::Parse { .. })
        ));
        assert!(matches!(
            parse_manual_input("", "1, 2"),
            Err(DemandError::Parse { .. })
        ));
        assert!(matches!(
            parse_manual_input("10,,20", "1, 2, 3"),
            Err(DemandError::Parse { .. })
        ));
    }

    #[test]
    fn test_manual_input_shape_and_size() {
        assert!(matches!(
            parse_manual_input("1, 2, 3", "4, 5"),
            Err(DemandError::ShapeMismatch { prices: 3, quantities: 2 })
        ));
        assert!(matches!(
            parse_manual_input("1", "4"),
            Err(DemandError::InsufficientData { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_apply_manual_keeps_dataset_on_error() {
        let mut dataset = Dataset::new();
        load_sample_data(&mut dataset).unwrap();

        assert!(apply_manual_data(&mut dataset, "1, 2, x", "1, 2, 3").is_err());
        assert_eq!(dataset.prices(), &SAMPLE_PRICES);

        assert_eq!(apply_manual_data(&mut dataset, "1, 2", "3, 4").unwrap(), 2);
        assert_eq!(dataset.prices(), &[1.0, 2.0]);
    }

    #[test]
    fn test_remote_series_drops_gaps_and_scales_volume() {
        let s = series(
            vec![Some(10.0), None, Some(11.0), Some(12.0), Some(13.0), Some(14.0), Some(15.0)],
            vec![Some(5000.0), Some(6000.0), None, Some(7000.0), Some(8000.0), Some(9000.0), Some(10_500.0)],
        );

        let (prices, quantities) = observations_from_series(&s).unwrap();
        assert_eq!(prices, vec![10.0, 12.0, 13.0, 14.0, 15.0]);
        assert_eq!(quantities.len(), 5);
        assert_abs_diff_eq!(quantities[0], 5.0);
        assert_abs_diff_eq!(quantities[4], 10.5);
    }

    #[test]
    fn test_remote_series_keeps_most_recent_days() {
        let close: Vec<Option<f64>> = (1..=22).map(|i| Some(i as f64)).collect();
        let volume: Vec<Option<f64>> = (1..=22).map(|i| Some(i as f64 * 1000.0)).collect();

        let (prices, quantities) = observations_from_series(&series(close, volume)).unwrap();
        assert_eq!(prices.len(), MAX_REMOTE_DAYS);
        assert_eq!(prices[0], 8.0);
        assert_eq!(prices[14], 22.0);
        assert_eq!(quantities[14], 22.0);
    }

    #[test]
    fn test_remote_series_needs_five_valid_days() {
        let s = series(
            vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)],
            vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0), Some(6.0)],
        );
        assert!(matches!(
            observations_from_series(&s),
            Err(DemandError::InsufficientData { required: 5, actual: 4 })
        ));
    }

    #[tokio::test]
    async fn test_unknown_source_is_data_source_error() {
        let client = YahooClient::with_base_url(
            "http://127.0.0.1:9".to_string(),
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        let mut dataset = Dataset::new();

        let err = load_api_data(&client, &mut dataset, "Initech", 30)
            .await
            .unwrap_err();

        match err {
            DemandError::DataSource { name, cause } => {
                assert_eq!(name, "Initech");
                assert!(matches!(cause, ApiError::UnsupportedSource(_)));
            }
            other => panic!("expected data source error, got {:?}", other),
        }
        assert!(!dataset.has_data());
    }

    #[tokio::test]
    async fn test_silent_endpoint_times_out() {
        // Bound but never accepted: the connection opens and no response ever comes
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = YahooClient::with_base_url(
            format!("http://{}", addr),
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        let mut dataset = Dataset::new();
        load_sample_data(&mut dataset).unwrap();

        let err = load_api_data(&client, &mut dataset, "Apple", 30)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DemandError::DataSource { ref name, cause: ApiError::Timeout(1) } if name == "Apple"
        ));
        assert_eq!(dataset.prices(), &SAMPLE_PRICES);
        drop(listener);
    }

    #[tokio::test]
    async fn test_network_failure_leaves_dataset_untouched() {
        let client = YahooClient::with_base_url(
            "http://127.0.0.1:9".to_string(),
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let mut dataset = Dataset::new();
        load_sample_data(&mut dataset).unwrap();

        let err = load_api_data(&client, &mut dataset, "Apple", 30)
            .await
            .unwrap_err();

        assert!(matches!(err, DemandError::DataSource { ref name, .. } if name == "Apple"));
        assert_eq!(dataset.quantities(), &SAMPLE_QUANTITIES);
    }
}
