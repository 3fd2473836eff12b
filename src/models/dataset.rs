//! Observation set and the fit snapshots computed from it

use super::fit::{LinearFit, LogFit};
use crate::utils::DemandError;

/// Latest observed price/quantity pairs plus the fits computed on them
///
/// Prices and quantities are index-aligned and always the same length. Replacing the
/// observations drops both fit snapshots.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    prices: Vec<f64>,
    quantities: Vec<f64>,
    linear: Option<LinearFit>,
    log: Option<LogFit>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored observations wholesale
    ///
    /// Mismatched lengths are rejected before anything is touched.
    pub fn update(&mut self, prices: Vec<f64>, quantities: Vec<f64>) -> Result<(), DemandError> {
        if prices.len() != quantities.len() {
            return Err(DemandError::ShapeMismatch {
                prices: prices.len(),
                quantities: quantities.len(),
            });
        }

        self.prices = prices;
        self.quantities = quantities;
        self.clear_fits();
        Ok(())
    }

    pub fn has_data(&self) -> bool {
        !self.prices.is_empty() && !self.quantities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn quantities(&self) -> &[f64] {
        &self.quantities
    }

    /// Smallest and largest observed price
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.prices.is_empty() {
            return None;
        }
        let min = self.prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    pub fn linear_fit(&self) -> Option<&LinearFit> {
        self.linear.as_ref()
    }

    pub fn log_fit(&self) -> Option<&LogFit> {
        self.log.as_ref()
    }

    pub fn linear_slope(&self) -> Option<f64> {
        self.linear.map(|f| f.slope)
    }

    pub fn linear_intercept(&self) -> Option<f64> {
        self.linear.map(|f| f.intercept)
    }

    pub fn linear_r_squared(&self) -> Option<f64> {
        self.linear.map(|f| f.r_squared)
    }

    pub fn linear_p_value(&self) -> Option<f64> {
        self.linear.map(|f| f.p_value)
    }

    pub fn log_a(&self) -> Option<f64> {
        self.log.map(|f| f.a)
    }

    pub fn log_b(&self) -> Option<f64> {
        self.log.map(|f| f.b)
    }

    pub fn log_r_squared(&self) -> Option<f64> {
        self.log.map(|f| f.r_squared)
    }

    pub fn log_elasticity(&self) -> Option<f64> {
        self.log.map(|f| f.elasticity)
    }

    pub(crate) fn store_linear(&mut self, fit: LinearFit) {
        self.linear = Some(fit);
    }

    pub(crate) fn store_log(&mut self, fit: LogFit) {
        self.log = Some(fit);
    }

    fn clear_fits(&mut self) {
        self.linear = None;
        self.log = None;
    }
}
