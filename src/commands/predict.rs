use super::CommandError;
use crate::models::FitKind;
use crate::services::regression_service;
use crate::session::Session;
use crate::utils::Table;

fn parse_kind(arg: Option<&&str>, usage: &str) -> Result<FitKind, CommandError> {
    arg.ok_or_else(|| CommandError::Usage(usage.to_string()))?
        .parse::<FitKind>()
        .map_err(CommandError::Usage)
}

/// `predict <linear|log> <price>`
pub fn execute(session: &mut Session, args: &[&str]) -> Result<String, CommandError> {
    const USAGE: &str = "Usage: `predict <linear|log> <price>`";

    let kind = parse_kind(args.first(), USAGE)?;
    let price = args
        .get(1)
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| CommandError::Usage(USAGE.to_string()))?;

    let quantity = regression_service::predict(&session.dataset, kind, price)?;
    Ok(format!(
        "🔮 {} model: Q({:.2}) = {:.4}",
        kind, price, quantity
    ))
}

/// `curve <linear|log> [n]`
pub fn execute_curve(session: &mut Session, args: &[&str]) -> Result<String, CommandError> {
    const USAGE: &str = "Usage: `curve <linear|log> [points]`";

    let kind = parse_kind(args.first(), USAGE)?;
    let count = match args.get(1) {
        Some(n) => n
            .parse::<usize>()
            .map_err(|_| CommandError::Usage(USAGE.to_string()))?,
        None => session.config.curve_points,
    };

    let points = regression_service::curve_points(&session.dataset, kind, count)?;

    let mut table = Table::new(&["Price", "Quantity"]);
    for point in &points {
        table.add_row(vec![
            format!("{:.2}", point.price),
            format!("{:.4}", point.quantity),
        ]);
    }

    Ok(format!(
        "📉 {} curve, {} points\n{}",
        kind,
        points.len(),
        table.render()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{handle_line, Outcome};
    use crate::config::Config;

    fn fitted_session() -> Session {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let mut session = Session::new(config).unwrap();
        session
            .dataset
            .update(vec![1.0, 2.0, 3.0, 4.0, 5.0], vec![2.0, 4.0, 5.0, 4.0, 5.0])
            .unwrap();
        regression_service::calculate_linear_regression(&mut session.dataset).unwrap();
        session
    }

    #[test]
    fn test_predict_linear() {
        let mut session = fitted_session();
        let text = execute(&mut session, &["linear", "10"]).unwrap();
        assert!(text.contains("8.2000"));
    }

    #[test]
    fn test_predict_usage_errors() {
        let mut session = fitted_session();
        assert!(matches!(execute(&mut session, &[]), Err(CommandError::Usage(_))));
        assert!(matches!(
            execute(&mut session, &["cubic", "1"]),
            Err(CommandError::Usage(_))
        ));
        assert!(matches!(
            execute(&mut session, &["linear", "cheap"]),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_curve_point_count() {
        let mut session = fitted_session();
        let text = execute_curve(&mut session, &["linear", "3"]).unwrap();
        assert!(text.contains("3 points"));
        assert!(text.contains("5.00"));

        let err = execute_curve(&mut session, &["log", "3"]).unwrap_err();
        assert!(err.to_string().contains("not been computed"));
    }

    #[tokio::test]
    async fn test_curve_uses_configured_default() {
        let mut session = fitted_session();
        session.config.curve_points = 4;
        match handle_line(&mut session, "curve linear").await {
            Outcome::Reply(text) => assert!(text.contains("4 points")),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
