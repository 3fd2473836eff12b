use std::path::PathBuf;

use crate::api::yahoo::{ApiError, YahooClient};
use crate::config::Config;
use crate::models::{Dataset, VisualizationMode};
use crate::services::chart_service::ChartOptions;

/// State owned by the interactive loop between commands
pub struct Session {
    pub config: Config,
    pub dataset: Dataset,
    pub client: YahooClient,
    pub view: VisualizationMode,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = YahooClient::with_base_url(config.api_base_url.clone(), config.fetch_timeout)?;

        Ok(Self {
            config,
            dataset: Dataset::new(),
            client,
            view: VisualizationMode::default(),
        })
    }

    /// Chart settings from the config, optionally writing somewhere else
    pub fn chart_options(&self, path: Option<PathBuf>) -> ChartOptions {
        ChartOptions {
            path: path.unwrap_or_else(|| self.config.chart_path.clone()),
            width: self.config.chart_width,
            height: self.config.chart_height,
            curve_points: self.config.curve_points,
        }
    }
}
