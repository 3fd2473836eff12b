//! Chart and curve sampling models

use std::str::FromStr;

use super::fit::FitKind;

/// A single point on a fitted demand curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub price: f64,
    pub quantity: f64,
}

/// Which regression lines the chart draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualizationMode {
    #[default]
    Both,
    Linear,
    Log,
}

impl VisualizationMode {
    pub fn includes(&self, kind: FitKind) -> bool {
        match self {
            VisualizationMode::Both => true,
            VisualizationMode::Linear => kind == FitKind::Linear,
            VisualizationMode::Log => kind == FitKind::Log,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationMode::Both => "both",
            VisualizationMode::Linear => "linear",
            VisualizationMode::Log => "log",
        }
    }
}

impl FromStr for VisualizationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" | "all" => Ok(VisualizationMode::Both),
            "linear" | "lin" => Ok(VisualizationMode::Linear),
            "log" | "loglog" | "log-log" => Ok(VisualizationMode::Log),
            _ => Err(format!("Unknown view '{}'. Use: both, linear, log", s)),
        }
    }
}
