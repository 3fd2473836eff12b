use super::CommandError;
use crate::services::acquisition_service;
use crate::session::Session;
use crate::utils::Table;

const USAGE: &str = "Usage: `manual <prices> ; <quantities>` e.g. `manual 10, 8, 6 ; 100, 120, 150`";

/// Split `prices ; quantities` (or `prices | quantities`) into the two fields
fn split_fields(rest: &str) -> Option<(&str, &str)> {
    let (prices, quantities) = rest.split_once(';').or_else(|| rest.split_once('|'))?;
    if quantities.contains(';') || quantities.contains('|') {
        return None;
    }
    Some((prices.trim(), quantities.trim()))
}

pub fn execute_manual(session: &mut Session, rest: &str) -> Result<String, CommandError> {
    let (prices, quantities) =
        split_fields(rest).ok_or_else(|| CommandError::Usage(USAGE.to_string()))?;

    let count = acquisition_service::apply_manual_data(&mut session.dataset, prices, quantities)?;
    Ok(format!("✅ Stored {} observations. Previous fits were cleared.", count))
}

pub fn execute_sample(session: &mut Session) -> Result<String, CommandError> {
    let count = acquisition_service::load_sample_data(&mut session.dataset)?;
    Ok(format!("✅ Loaded the sample demand schedule ({} observations).", count))
}

pub fn execute_show(session: &Session) -> String {
    let dataset = &session.dataset;
    if !dataset.has_data() {
        return "No data loaded. Use `load`, `manual` or `sample`.".to_string();
    }

    let mut table = Table::new(&["#", "Price", "Quantity"]);
    for (i, (price, quantity)) in dataset.prices().iter().zip(dataset.quantities()).enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            format!("{:.2}", price),
            format!("{:.2}", quantity),
        ]);
    }

    format!("📊 {} observations\n{}", dataset.len(), table.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("1, 2 ; 3, 4"), Some(("1, 2", "3, 4")));
        assert_eq!(split_fields("1,2|3,4"), Some(("1,2", "3,4")));
        assert_eq!(split_fields("1, 2, 3, 4"), None);
        assert_eq!(split_fields("1 ; 2 ; 3"), None);
    }
}
