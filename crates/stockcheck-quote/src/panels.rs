//! Labeled panels built from a quote record
//!
//! Both front-ends render the same rows; the web dashboard groups them into
//! tabs and the terminal prints them as sections.

use crate::record::{NOT_AVAILABLE, QuoteRecord, labels};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DIVIDEND_PCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+\.\d+)%\)").expect("valid dividend regex"));

/// One label/value line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRow {
    pub label: String,
    pub value: String,
}

/// A titled group of rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub rows: Vec<PanelRow>,
}

impl Panel {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    fn row(mut self, label: &str, value: impl Into<String>) -> Self {
        self.rows.push(PanelRow {
            label: label.to_string(),
            value: value.into(),
        });
        self
    }

    /// Row showing a record field under its own label
    fn field(self, record: &QuoteRecord, label: &str) -> Self {
        self.row(label, record.get(label))
    }

    /// Value of the first row with this label
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

/// How the trading signal is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalTone {
    Positive,
    Negative,
    Neutral,
}

/// The trading signal with its highlight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub value: String,
    pub tone: SignalTone,
}

/// Prefix a price with `$` unless it already has one or is `N/A`
pub fn with_dollar(value: &str) -> String {
    if value == NOT_AVAILABLE || value.starts_with('$') {
        value.to_string()
    } else {
        format!("${value}")
    }
}

fn dollar_field(record: &QuoteRecord, label: &str) -> String {
    with_dollar(record.get(label))
}

/// Overview tab: company information, financial metrics, valuation ratios
pub fn overview_panels(record: &QuoteRecord) -> Vec<Panel> {
    vec![
        Panel::new("Company Information")
            .field(record, labels::COMPANY)
            .field(record, labels::SECTOR)
            .field(record, labels::INDUSTRY)
            .field(record, labels::COUNTRY),
        Panel::new("Financial Metrics")
            .field(record, labels::MARKET_CAP)
            .row(labels::PRICE, dollar_field(record, labels::PRICE))
            .field(record, labels::VOLUME)
            .row(labels::HIGH_52W, dollar_field(record, labels::HIGH_52W)),
        Panel::new("Valuation Ratios")
            .field(record, labels::PE)
            .field(record, labels::PB)
            .field(record, labels::ROE)
            .field(record, labels::RECOMMENDATION),
    ]
}

/// Analysis tab: performance metrics, risk and dividend
pub fn analysis_panels(record: &QuoteRecord) -> Vec<Panel> {
    let (dividend, dividend_pct) = dividend_parts(record);
    let volatility = format!(
        "{} / {}",
        record.get(labels::VOLATILITY_W),
        record.get(labels::VOLATILITY_M)
    );

    vec![
        Panel::new("Performance Metrics")
            .field(record, labels::ROE)
            .row("ROI (ROIC)", record.get(labels::ROIC))
            .field(record, labels::ROA)
            .field(record, labels::PROFIT_MARGIN),
        Panel::new("Risk & Dividend")
            .field(record, labels::BETA)
            .row("Volatility (W/M)", volatility)
            .row(labels::DIVIDEND, dividend)
            .row(labels::DIVIDEND_PCT, dividend_pct),
    ]
}

/// Dividend amount and percent from `Dividend Est.`, else `Dividend TTM`
///
/// `"1.02 (0.44%)"` gives `("1.02", "0.44%")`.
pub fn dividend_parts(record: &QuoteRecord) -> (String, String) {
    let source = record
        .get_opt(labels::DIVIDEND_EST)
        .or_else(|| record.get_opt(labels::DIVIDEND_TTM))
        .unwrap_or(NOT_AVAILABLE);

    let amount = source.split(' ').next().unwrap_or(NOT_AVAILABLE).to_string();
    let percent = DIVIDEND_PCT_RE
        .captures(source)
        .map_or_else(|| NOT_AVAILABLE.to_string(), |c| format!("{}%", &c[1]));

    (amount, percent)
}

/// Trading signal with its tone; a blank signal reads `N/A`
pub fn signal(record: &QuoteRecord) -> Signal {
    let value = record.get(labels::SIGNAL).trim();
    let value = if value.is_empty() { NOT_AVAILABLE } else { value };

    let tone = match value {
        "Buy" => SignalTone::Positive,
        "Sell" => SignalTone::Negative,
        _ => SignalTone::Neutral,
    };

    Signal {
        value: value.to_string(),
        tone,
    }
}

/// Sections of the terminal dashboard, in print order
///
/// `chart_url` is the provider's chart image for live records; fallback
/// records only point at the provider's site.
pub fn terminal_sections(record: &QuoteRecord, chart_url: Option<&str>) -> Vec<Panel> {
    let charts = match chart_url {
        Some(url) if !record.is_fallback() => Panel::new("📊 CHART INFORMATION")
            .row("Charts", format!("✅ Charts available for {}", record.ticker()))
            .row("Chart URL", url)
            .row("Chart types", "Price, Volume, RSI, MACD, Bollinger Bands")
            .row("Tip", "💡 Charts show technical indicators and price movements"),
        _ => Panel::new("📊 CHART INFORMATION")
            .row("Charts", "Real-time charts available on Finviz.com"),
    };

    vec![
        Panel::new("🏢 COMPANY OVERVIEW")
            .field(record, labels::COMPANY)
            .field(record, labels::SECTOR)
            .field(record, labels::INDUSTRY)
            .field(record, labels::COUNTRY),
        Panel::new("💰 FINANCIAL METRICS")
            .field(record, labels::MARKET_CAP)
            .field(record, labels::ENTERPRISE_VALUE)
            .row(labels::PRICE, dollar_field(record, labels::PRICE))
            .row(labels::HIGH_52W, dollar_field(record, labels::HIGH_52W))
            .row(labels::LOW_52W, dollar_field(record, labels::LOW_52W))
            .field(record, labels::VOLUME),
        Panel::new("📈 VALUATION RATIOS")
            .row("P/E Ratio", record.get(labels::PE))
            .row("P/B Ratio", record.get(labels::PB))
            .row("P/S Ratio", record.get(labels::PS))
            .row("PEG Ratio", record.get(labels::PEG)),
        Panel::new("📊 PERFORMANCE METRICS")
            .field(record, labels::ROE)
            .field(record, labels::ROI)
            .field(record, labels::ROA)
            .field(record, labels::PROFIT_MARGIN),
        Panel::new("💎 DIVIDEND INFORMATION")
            .field(record, labels::DIVIDEND)
            .field(record, labels::DIVIDEND_PCT)
            .field(record, labels::PAYOUT_RATIO),
        Panel::new("🎯 ANALYST RECOMMENDATIONS")
            .field(record, labels::RECOMMENDATION)
            .row(labels::TARGET_PRICE, dollar_field(record, labels::TARGET_PRICE)),
        Panel::new("⚠️  RISK METRICS")
            .field(record, labels::BETA)
            .field(record, labels::VOLATILITY),
        charts,
        Panel::new("🚨 TRADING SIGNAL").row(labels::SIGNAL, signal(record).value),
        Panel::new("⭐ ANALYST RATINGS").field(record, labels::RATINGS),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DataOrigin;

    fn live_record() -> QuoteRecord {
        let mut record = QuoteRecord::new("AAPL", DataOrigin::Live);
        for (label, value) in [
            (labels::COMPANY, "Apple Inc"),
            (labels::PRICE, "229.54"),
            (labels::ROIC, "44.12%"),
            (labels::DIVIDEND_EST, "1.02 (0.44%)"),
            (labels::DIVIDEND_TTM, "0.99 (0.43%)"),
            (labels::VOLATILITY_W, "1.21%"),
            (labels::VOLATILITY_M, "1.43%"),
            (labels::SIGNAL, "New High"),
        ] {
            record.insert(label, value);
        }
        record
    }

    #[test]
    fn test_with_dollar() {
        assert_eq!(with_dollar("150.25"), "$150.25");
        assert_eq!(with_dollar("$150.25"), "$150.25");
        assert_eq!(with_dollar("N/A"), "N/A");
    }

    #[test]
    fn test_overview_panels() {
        let panels = overview_panels(&live_record());

        assert_eq!(panels.len(), 3);
        assert_eq!(panels[0].value("Company"), Some("Apple Inc"));
        assert_eq!(panels[0].value("Sector"), Some("N/A"));
        assert_eq!(panels[1].value("Price"), Some("$229.54"));
        assert_eq!(panels[1].value("52W High"), Some("N/A"));
        assert_eq!(panels[2].title, "Valuation Ratios");
    }

    #[test]
    fn test_analysis_panels() {
        let panels = analysis_panels(&live_record());

        assert_eq!(panels[0].value("ROI (ROIC)"), Some("44.12%"));
        assert_eq!(panels[1].value("Volatility (W/M)"), Some("1.21% / 1.43%"));
        assert_eq!(panels[1].value("Dividend"), Some("1.02"));
        assert_eq!(panels[1].value("Dividend %"), Some("0.44%"));
    }

    #[test]
    fn test_dividend_falls_back_to_ttm() {
        let mut record = QuoteRecord::new("KO", DataOrigin::Live);
        record.insert(labels::DIVIDEND_TTM, "1.94 (2.80%)");
        assert_eq!(dividend_parts(&record), ("1.94".to_string(), "2.80%".to_string()));

        let empty = QuoteRecord::new("NOPE", DataOrigin::Live);
        assert_eq!(dividend_parts(&empty), ("N/A".to_string(), "N/A".to_string()));
    }

    #[test]
    fn test_signal_tone() {
        let mut record = QuoteRecord::new("AAPL", DataOrigin::Live);
        record.insert(labels::SIGNAL, "Buy");
        assert_eq!(signal(&record).tone, SignalTone::Positive);

        record.insert(labels::SIGNAL, "Sell");
        assert_eq!(signal(&record).tone, SignalTone::Negative);

        record.insert(labels::SIGNAL, "  ");
        let blank = signal(&record);
        assert_eq!(blank.value, "N/A");
        assert_eq!(blank.tone, SignalTone::Neutral);
    }

    #[test]
    fn test_terminal_sections_for_fallback() {
        let record = QuoteRecord::fallback_named("APPL", Some("Apple"));
        let sections = terminal_sections(&record, Some("https://charts.example/x.png"));

        assert_eq!(sections.len(), 10);
        assert_eq!(sections[0].value("Company"), Some("Apple (APPL)"));
        // Fallback prices already carry a dollar sign
        assert_eq!(sections[1].value("Price"), Some("$150.25"));
        assert_eq!(sections[5].value("Target Price"), Some("$165.00"));
        assert_eq!(
            sections[7].value("Charts"),
            Some("Real-time charts available on Finviz.com")
        );
        assert_eq!(sections[9].value("Ratings"), Some("Positive"));
    }

    #[test]
    fn test_terminal_chart_section_for_live_record() {
        let sections = terminal_sections(&live_record(), Some("https://charts.example/x.png"));
        let charts = &sections[7];

        assert_eq!(charts.value("Charts"), Some("✅ Charts available for AAPL"));
        assert_eq!(charts.value("Chart URL"), Some("https://charts.example/x.png"));
    }
}
