//! The flat quote record shown by every dashboard

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder shown for any label the record does not carry
pub const NOT_AVAILABLE: &str = "N/A";

/// Display labels read by the panels
pub mod labels {
    pub const COMPANY: &str = "Company";
    pub const SECTOR: &str = "Sector";
    pub const INDUSTRY: &str = "Industry";
    pub const COUNTRY: &str = "Country";
    pub const EXCHANGE: &str = "Exchange";
    pub const MARKET_CAP: &str = "Market Cap";
    pub const ENTERPRISE_VALUE: &str = "Enterprise Value";
    pub const PRICE: &str = "Price";
    pub const HIGH_52W: &str = "52W High";
    pub const LOW_52W: &str = "52W Low";
    pub const RANGE_52W: &str = "52W Range";
    pub const VOLUME: &str = "Volume";
    pub const PE: &str = "P/E";
    pub const PB: &str = "P/B";
    pub const PS: &str = "P/S";
    pub const PEG: &str = "PEG";
    pub const ROE: &str = "ROE";
    pub const ROI: &str = "ROI";
    pub const ROIC: &str = "ROIC";
    pub const ROA: &str = "ROA";
    pub const PROFIT_MARGIN: &str = "Profit Margin";
    pub const DIVIDEND: &str = "Dividend";
    pub const DIVIDEND_PCT: &str = "Dividend %";
    pub const DIVIDEND_EST: &str = "Dividend Est.";
    pub const DIVIDEND_TTM: &str = "Dividend TTM";
    pub const PAYOUT_RATIO: &str = "Payout Ratio";
    pub const RECOMMENDATION: &str = "Recommendation";
    pub const TARGET_PRICE: &str = "Target Price";
    pub const BETA: &str = "Beta";
    pub const VOLATILITY: &str = "Volatility";
    pub const VOLATILITY_W: &str = "Volatility W";
    pub const VOLATILITY_M: &str = "Volatility M";
    pub const DESCRIPTION: &str = "Description";
    pub const SIGNAL: &str = "Signal";
    pub const RATINGS: &str = "Ratings";
}

/// Where a record's values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Parsed from the provider's response
    Live,
    /// The canned record substituted after a failed fetch
    Fallback,
}

/// Label → pre-formatted display string for one ticker
///
/// Values stay strings exactly as the provider formats them ("2.5T",
/// "32.5%"). Missing labels read as [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    ticker: String,
    origin: DataOrigin,
    fields: BTreeMap<String, String>,
}

impl QuoteRecord {
    /// Create an empty record
    pub fn new(ticker: impl Into<String>, origin: DataOrigin) -> Self {
        Self {
            ticker: ticker.into(),
            origin,
            fields: BTreeMap::new(),
        }
    }

    /// The canned record used whenever a live fetch fails
    ///
    /// Company reads `Sample Company (<TICKER>)`.
    pub fn fallback(ticker: &str) -> Self {
        Self::fallback_named(ticker, None)
    }

    /// Fallback record whose company line uses a typed-in name when given
    pub fn fallback_named(ticker: &str, company_name: Option<&str>) -> Self {
        let name = company_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Sample Company");

        let mut record = Self::new(ticker, DataOrigin::Fallback);
        record.insert(labels::COMPANY, format!("{name} ({ticker})"));
        for (label, value) in FALLBACK_FIELDS {
            record.insert(*label, *value);
        }
        record
    }

    /// Ticker the record was built for
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }

    /// Set a label, replacing any previous value
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(label.into(), value.into());
    }

    /// Value for a label, or `"N/A"`
    pub fn get(&self, label: &str) -> &str {
        self.get_opt(label).unwrap_or(NOT_AVAILABLE)
    }

    /// Value for a label if present
    pub fn get_opt(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.fields.contains_key(label)
    }

    pub fn company(&self) -> &str {
        self.get(labels::COMPANY)
    }

    /// All label/value pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

const FALLBACK_FIELDS: &[(&str, &str)] = &[
    (labels::SECTOR, "Technology"),
    (labels::INDUSTRY, "Consumer Electronics"),
    (labels::COUNTRY, "USA"),
    (labels::MARKET_CAP, "$2.5T"),
    (labels::ENTERPRISE_VALUE, "$2.4T"),
    (labels::PRICE, "$150.25"),
    (labels::HIGH_52W, "$175.50"),
    (labels::LOW_52W, "$120.00"),
    (labels::VOLUME, "45,231,100"),
    (labels::PE, "25.5"),
    (labels::PB, "8.2"),
    (labels::PS, "6.1"),
    (labels::PEG, "1.8"),
    (labels::ROE, "32.5%"),
    (labels::ROI, "28.3%"),
    (labels::ROA, "18.7%"),
    (labels::PROFIT_MARGIN, "22.4%"),
    (labels::DIVIDEND, "$0.96"),
    (labels::DIVIDEND_PCT, "2.5%"),
    (labels::PAYOUT_RATIO, "25.0%"),
    (labels::RECOMMENDATION, "Buy"),
    (labels::TARGET_PRICE, "$165.00"),
    (labels::BETA, "1.25"),
    (labels::VOLATILITY, "25.2%"),
    (labels::DESCRIPTION, "Sample company description"),
    (labels::SIGNAL, "Buy"),
    (labels::RATINGS, "Positive"),
];
