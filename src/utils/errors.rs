use thiserror::Error;

use crate::api::yahoo::ApiError;
use crate::models::FitKind;

/// Failures of the demand analysis core
///
/// Every user action either succeeds or yields exactly one of these. None of them
/// leaves the dataset half-updated.
#[derive(Debug, Error)]
pub enum DemandError {
    /// A manual input token is not a finite number
    #[error("Invalid number '{token}' in {field}")]
    Parse { field: &'static str, token: String },

    /// Prices and quantities differ in length
    #[error("Got {prices} prices but {quantities} quantities; both lists must have the same length")]
    ShapeMismatch { prices: usize, quantities: usize },

    #[error("At least {required} data points are required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A value lies outside the domain of the model (non-positive input to a log fit,
    /// undefined prediction)
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    /// Zero-variance input to a least-squares fit
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("The {0} regression has not been computed yet")]
    NotFitted(FitKind),

    #[error("Failed to load data from {name}: {cause}")]
    DataSource {
        name: String,
        #[source]
        cause: ApiError,
    },
}

impl DemandError {
    pub(crate) fn data_source(name: impl Into<String>, cause: ApiError) -> Self {
        DemandError::DataSource {
            name: name.into(),
            cause,
        }
    }
}
