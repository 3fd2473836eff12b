use tracing::info;

use super::CommandError;
use crate::models::StockSource;
use crate::services::acquisition_service;
use crate::session::Session;
use crate::utils::Table;

pub fn execute_sources() -> String {
    let mut table = Table::new(&["Source", "Ticker"]);
    for source in StockSource::ALL {
        table.add_row(vec![source.name(), source.symbol()]);
    }
    format!("📋 Available sources\n{}", table.render())
}

/// `load <source>`; source names may contain spaces
pub async fn execute(session: &mut Session, args: &[&str]) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage(
            "Usage: `load <source>`. Type `sources` for the list.".to_string(),
        ));
    }

    let source_name = args.join(" ");
    info!("📥 Load command for '{}'", source_name);

    let (source, count) = acquisition_service::load_api_data(
        &session.client,
        &mut session.dataset,
        &source_name,
        session.config.window_days,
    )
    .await?;

    Ok(format!(
        "✅ Loaded {} observations for {}. Quantities are volumes in thousands.",
        count, source
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_lists_every_ticker() {
        let text = execute_sources();
        for source in StockSource::ALL {
            assert!(text.contains(source.symbol()));
        }
        assert!(text.contains("NVIDIA"));
    }
}
