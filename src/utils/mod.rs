pub mod errors;
pub mod table;

pub use errors::DemandError;
pub use table::Table;

/// Format a statistic for display
///
/// Very small magnitudes (typical of p-values) switch to scientific notation so they
/// don't collapse to zero.
pub fn format_stat(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-4 {
        format!("{:.3e}", value)
    } else {
        format!("{:.4}", value)
    }
}
