use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::api::yahoo::YahooClient;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings, read from the environment (and `.env` via dotenv)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub fetch_timeout: Duration,
    /// Calendar days of quotes requested per load
    pub window_days: i64,
    pub chart_path: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Default sample count for `curve`
    pub curve_points: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: YahooClient::DEFAULT_BASE_URL.to_string(),
            fetch_timeout: Duration::from_secs(10),
            window_days: 30,
            chart_path: PathBuf::from("demand_chart.png"),
            chart_width: 1000,
            chart_height: 600,
            curve_points: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_secs = parse_or(&lookup, "QUOTE_FETCH_TIMEOUT_SECS", defaults.fetch_timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "QUOTE_FETCH_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }

        let window_days = parse_or(&lookup, "QUOTE_WINDOW_DAYS", defaults.window_days)?;
        if window_days < 1 {
            return Err(ConfigError::InvalidValue {
                key: "QUOTE_WINDOW_DAYS",
                value: window_days.to_string(),
                reason: "window must cover at least one day".to_string(),
            });
        }

        Ok(Self {
            api_base_url: lookup("QUOTE_API_BASE_URL").unwrap_or(defaults.api_base_url),
            fetch_timeout: Duration::from_secs(timeout_secs),
            window_days,
            chart_path: lookup("CHART_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.chart_path),
            chart_width: parse_or(&lookup, "CHART_WIDTH", defaults.chart_width)?,
            chart_height: parse_or(&lookup, "CHART_HEIGHT", defaults.chart_height)?,
            curve_points: parse_or(&lookup, "CURVE_POINTS", defaults.curve_points)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.window_days, 30);
        assert_eq!(config.chart_width, 1000);
        assert_eq!(config.chart_height, 600);
        assert_eq!(config.curve_points, 100);
        assert_eq!(config.api_base_url, YahooClient::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("QUOTE_FETCH_TIMEOUT_SECS", "3"),
            ("CHART_OUTPUT_PATH", "/tmp/curve.png"),
            ("CURVE_POINTS", " 25 "),
        ])
        .unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.chart_path, PathBuf::from("/tmp/curve.png"));
        assert_eq!(config.curve_points, 25);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = config_from(&[("CHART_WIDTH", "wide")]).unwrap_err();
        assert!(err.to_string().contains("CHART_WIDTH"));

        let err = config_from(&[("QUOTE_FETCH_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("QUOTE_FETCH_TIMEOUT_SECS"));
    }
}
