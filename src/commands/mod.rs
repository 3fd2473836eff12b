pub mod chart;
pub mod data;
pub mod fit;
pub mod help;
pub mod load;
pub mod predict;

use thiserror::Error;
use tracing::{info, warn};

use crate::services::chart_service::ChartError;
use crate::session::Session;
use crate::utils::DemandError;

/// Failure of a single command; the session stays usable afterwards
#[derive(Debug, Error)]
pub enum CommandError {
    /// Wrong arguments; the message says how to call the command
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Demand(#[from] DemandError),
    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// What the loop should do after a line
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Reply(String),
    Quit,
    Nothing,
}

/// Parse and run one input line
///
/// Errors are rendered into the reply here so no single action can take the loop down.
pub async fn handle_line(session: &mut Session, line: &str) -> Outcome {
    let line = line.trim();
    if line.is_empty() {
        return Outcome::Nothing;
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let command = command.to_lowercase();
    let args: Vec<&str> = rest.split_whitespace().collect();

    info!("Command '{}' with args: {:?}", command, args);

    let result = match command.as_str() {
        "help" | "?" => Ok(help::execute()),
        "sources" => Ok(load::execute_sources()),
        "load" | "api" => load::execute(session, &args).await,
        "manual" => data::execute_manual(session, rest),
        "sample" => data::execute_sample(session),
        "data" | "show" => Ok(data::execute_show(session)),
        "fit" | "calc" => fit::execute(session, &args),
        "equation" | "eq" => fit::execute_equation(session, &args),
        "predict" => predict::execute(session, &args),
        "curve" => predict::execute_curve(session, &args),
        "view" => chart::execute_view(session, &args),
        "chart" | "plot" => chart::execute(session, &args),
        "quit" | "exit" => return Outcome::Quit,
        _ => Err(CommandError::Usage(format!(
            "Unknown command '{}'. Type `help` for the list of commands.",
            command
        ))),
    };

    match result {
        Ok(reply) => Outcome::Reply(reply),
        Err(e) => {
            warn!("Error executing command {}: {}", command, e);
            Outcome::Reply(format!("❌ Command Error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> Session {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            fetch_timeout: std::time::Duration::from_secs(1),
            chart_path: std::env::temp_dir().join("demand_analyzer_test.png"),
            ..Config::default()
        };
        Session::new(config).unwrap()
    }

    fn reply(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(text) => text,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_and_quit() {
        let mut session = session();
        assert_eq!(handle_line(&mut session, "   ").await, Outcome::Nothing);
        assert_eq!(handle_line(&mut session, "EXIT").await, Outcome::Quit);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut session = session();
        let text = reply(handle_line(&mut session, "frobnicate 1 2").await);
        assert!(text.starts_with("❌"));
        assert!(text.contains("frobnicate"));
    }

    #[tokio::test]
    async fn test_manual_fit_predict_flow() {
        let mut session = session();

        let text = reply(handle_line(&mut session, "manual 1, 2, 4 ; 8, 4, 2").await);
        assert!(text.contains("3 observations"));

        let text = reply(handle_line(&mut session, "predict linear 3").await);
        assert!(text.starts_with("❌"));
        assert!(text.contains("not been computed"));

        let text = reply(handle_line(&mut session, "fit").await);
        assert!(text.contains("Q = 8.00 * P^-1.00"));

        let text = reply(handle_line(&mut session, "predict log 8").await);
        assert!(text.contains("1.0000"));

        // New data drops both fits
        reply(handle_line(&mut session, "sample").await);
        let text = reply(handle_line(&mut session, "predict log 8").await);
        assert!(text.contains("not been computed"));
    }

    #[tokio::test]
    async fn test_failed_command_keeps_state() {
        let mut session = session();
        reply(handle_line(&mut session, "sample").await);
        reply(handle_line(&mut session, "fit linear").await);

        let text = reply(handle_line(&mut session, "manual 1, 2, 3 ; 4, 5").await);
        assert!(text.starts_with("❌"));
        assert_eq!(session.dataset.len(), 8);
        assert!(session.dataset.linear_fit().is_some());

        let text = reply(handle_line(&mut session, "load Initech").await);
        assert!(text.contains("Initech"));
        assert_eq!(session.dataset.len(), 8);
        assert!(session.dataset.linear_fit().is_some());
    }
}
