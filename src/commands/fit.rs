use tracing::info;

use super::CommandError;
use crate::models::{Dataset, FitKind, NOT_COMPUTED};
use crate::services::regression_service;
use crate::session::Session;
use crate::utils::{format_stat, Table};

fn or_not_computed(value: Option<f64>) -> String {
    value.map(format_stat).unwrap_or_else(|| NOT_COMPUTED.to_string())
}

/// Summary of both models, fitted or not
pub fn summary_table(dataset: &Dataset) -> String {
    let mut table = Table::new(&["Model", "Equation", "R²", "p-value", "Elasticity"]);
    table.add_row(vec![
        "Linear".to_string(),
        regression_service::equation_string(dataset, FitKind::Linear),
        or_not_computed(dataset.linear_r_squared()),
        or_not_computed(dataset.linear_p_value()),
        "-".to_string(),
    ]);
    table.add_row(vec![
        "Log-log".to_string(),
        regression_service::equation_string(dataset, FitKind::Log),
        or_not_computed(dataset.log_r_squared()),
        "-".to_string(),
        or_not_computed(dataset.log_elasticity()),
    ]);

    let mut coefficients = Table::new(&["Coefficient", "Value"]);
    coefficients.add_row(vec!["Linear intercept".to_string(), or_not_computed(dataset.linear_intercept())]);
    coefficients.add_row(vec!["Linear slope".to_string(), or_not_computed(dataset.linear_slope())]);
    coefficients.add_row(vec!["Log-log a".to_string(), or_not_computed(dataset.log_a())]);
    coefficients.add_row(vec!["Log-log b".to_string(), or_not_computed(dataset.log_b())]);

    format!("{}\n\n{}", table.render(), coefficients.render())
}

/// `fit [linear|log|both]`
///
/// With `both` the linear fit is stored before the log-log fit is attempted, so a
/// log-domain failure still leaves the linear model usable.
pub fn execute(session: &mut Session, args: &[&str]) -> Result<String, CommandError> {
    let selection = args.first().copied().unwrap_or("both").to_lowercase();
    let kinds = match selection.as_str() {
        "both" | "all" => vec![FitKind::Linear, FitKind::Log],
        other => vec![other.parse::<FitKind>().map_err(CommandError::Usage)?],
    };

    info!("📈 Fit command for {:?}", kinds);

    for kind in kinds {
        match kind {
            FitKind::Linear => {
                regression_service::calculate_linear_regression(&mut session.dataset)?;
            }
            FitKind::Log => {
                regression_service::calculate_log_regression(&mut session.dataset)?;
            }
        }
    }

    Ok(format!("✅ Regression complete\n{}", summary_table(&session.dataset)))
}

/// `equation [linear|log]`
pub fn execute_equation(session: &mut Session, args: &[&str]) -> Result<String, CommandError> {
    let dataset = &session.dataset;
    match args.first() {
        Some(kind) => {
            let kind = kind.parse::<FitKind>().map_err(CommandError::Usage)?;
            Ok(regression_service::equation_string(dataset, kind))
        }
        None => Ok(format!(
            "Linear:  {}\nLog-log: {}",
            regression_service::equation_string(dataset, FitKind::Linear),
            regression_service::equation_string(dataset, FitKind::Log)
        )),
    }
}
