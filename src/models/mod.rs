//! Data models for the demand analyzer
//!
//! The dataset, fit snapshots and small value types shared by services and commands.

pub mod chart;
pub mod dataset;
pub mod fit;
pub mod source;

// Re-export commonly used types for convenience
pub use chart::{CurvePoint, VisualizationMode};
pub use dataset::Dataset;
pub use fit::{FitKind, LinearFit, LogFit, NOT_COMPUTED};
pub use source::StockSource;
