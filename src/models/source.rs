//! Remote quote sources

use std::fmt;

/// Companies whose daily quotes can be loaded as demand observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSource {
    Apple,
    Microsoft,
    Google,
    Amazon,
    Tesla,
    Meta,
    Netflix,
    Nvidia,
}

impl StockSource {
    pub const ALL: [StockSource; 8] = [
        StockSource::Apple,
        StockSource::Microsoft,
        StockSource::Google,
        StockSource::Amazon,
        StockSource::Tesla,
        StockSource::Meta,
        StockSource::Netflix,
        StockSource::Nvidia,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StockSource::Apple => "Apple",
            StockSource::Microsoft => "Microsoft",
            StockSource::Google => "Google",
            StockSource::Amazon => "Amazon",
            StockSource::Tesla => "Tesla",
            StockSource::Meta => "Meta",
            StockSource::Netflix => "Netflix",
            StockSource::Nvidia => "NVIDIA",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            StockSource::Apple => "AAPL",
            StockSource::Microsoft => "MSFT",
            StockSource::Google => "GOOGL",
            StockSource::Amazon => "AMZN",
            StockSource::Tesla => "TSLA",
            StockSource::Meta => "META",
            StockSource::Netflix => "NFLX",
            StockSource::Nvidia => "NVDA",
        }
    }

    /// Look up a source by company name or ticker (case-insensitive)
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|source| {
            source.name().eq_ignore_ascii_case(name) || source.symbol().eq_ignore_ascii_case(name)
        })
    }
}

impl fmt::Display for StockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.symbol())
    }
}
