use std::path::PathBuf;

use tracing::info;

use super::CommandError;
use crate::models::VisualizationMode;
use crate::services::chart_service;
use crate::session::Session;

/// `view <both|linear|log>`; with no argument shows the current mode
pub fn execute_view(session: &mut Session, args: &[&str]) -> Result<String, CommandError> {
    let Some(arg) = args.first() else {
        return Ok(format!("👁️ Current view: {}", session.view.as_str()));
    };

    session.view = arg.parse::<VisualizationMode>().map_err(CommandError::Usage)?;
    Ok(format!("👁️ View set to {}", session.view.as_str()))
}

/// `chart [path]`
pub fn execute(session: &mut Session, args: &[&str]) -> Result<String, CommandError> {
    let options = session.chart_options(args.first().map(PathBuf::from));
    info!("🎨 Chart command ({} view)", session.view.as_str());

    let path = chart_service::render_demand_chart(&session.dataset, session.view, &options)?;
    Ok(format!("✅ Chart saved to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn session() -> Session {
        Session::new(Config::default()).unwrap()
    }

    #[test]
    fn test_view_switches_mode() {
        let mut session = session();
        assert!(execute_view(&mut session, &[]).unwrap().contains("both"));

        execute_view(&mut session, &["log"]).unwrap();
        assert_eq!(session.view, VisualizationMode::Log);

        assert!(execute_view(&mut session, &["sideways"]).is_err());
        assert_eq!(session.view, VisualizationMode::Log);
    }

    #[test]
    fn test_chart_without_data() {
        let mut session = session();
        let err = execute(&mut session, &[]).unwrap_err();
        assert!(matches!(err, CommandError::Chart(_)));
    }
}
