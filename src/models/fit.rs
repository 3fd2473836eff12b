//! Regression result models

use std::fmt;
use std::str::FromStr;

/// Which demand model a request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitKind {
    /// Q = intercept + slope * P
    Linear,
    /// Q = a * P^b, fitted on (ln P, ln Q)
    Log,
}

impl fmt::Display for FitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitKind::Linear => write!(f, "linear"),
            FitKind::Log => write!(f, "log-log"),
        }
    }
}

impl FromStr for FitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" | "lin" => Ok(FitKind::Linear),
            "log" | "loglog" | "log-log" => Ok(FitKind::Log),
            _ => Err(format!("Unknown model '{}'. Use: linear, log", s)),
        }
    }
}

/// Snapshot of a linear demand fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Two-sided p-value for the null hypothesis slope = 0
    pub p_value: f64,
}

/// Snapshot of a log-log (constant elasticity) demand fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogFit {
    pub a: f64,
    pub b: f64,
    /// Computed on the log scale
    pub r_squared: f64,
    /// Price elasticity of demand, identical to `b`
    pub elasticity: f64,
}

/// Marker returned by equation formatting when the fit is unset
pub const NOT_COMPUTED: &str = "Not computed";
