//! Terminal rendering of the dashboard

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use stockcheck_quote::panels::{Panel, terminal_sections};
use stockcheck_quote::{ConnectionReport, ConnectionStatus, QuoteRecord};

const RULE_WIDTH: usize = 60;

/// Final line of every dashboard
pub const SUCCESS_LINE: &str = "Dashboard generated successfully! ✅";

/// The whole sectioned dashboard as printable text
pub fn render_dashboard(record: &QuoteRecord, chart_url: Option<&str>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("\n{rule}\n📊 STOCK DASHBOARD - {}\n{rule}\n", record.ticker());

    for section in terminal_sections(record, chart_url) {
        out.push('\n');
        out.push_str(&render_section(&section));
        out.push('\n');
    }

    out.push_str(&format!("\n{rule}\n{SUCCESS_LINE}\n{rule}\n"));
    out
}

fn render_section(panel: &Panel) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for row in &panel.rows {
        table.add_row(vec![row.label.as_str(), row.value.as_str()]);
    }
    format!("{}\n{table}", panel.title)
}

/// One line per probed ticker
pub fn render_connection_report(report: &ConnectionReport) -> String {
    let mut out = String::from("API Test Results\n");
    for probe in report.iter() {
        let line = match &probe.status {
            ConnectionStatus::Success { company } => format!("✅ {}: {}", probe.ticker, company),
            ConnectionStatus::Error { error } => format!("❌ {}: {}", probe.ticker, error),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcheck_quote::ConnectionProbe;

    #[test]
    fn test_dashboard_sections() {
        let record = QuoteRecord::fallback_named("APPL", Some("Apple"));
        let text = render_dashboard(&record, None);

        assert!(text.contains("📊 STOCK DASHBOARD - APPL"));
        assert!(text.contains("Apple (APPL)"));
        for title in [
            "🏢 COMPANY OVERVIEW",
            "💰 FINANCIAL METRICS",
            "💎 DIVIDEND INFORMATION",
            "⚠️  RISK METRICS",
            "⭐ ANALYST RATINGS",
        ] {
            assert!(text.contains(title), "missing section {title}");
        }
        assert!(text.contains("Real-time charts available on Finviz.com"));
        assert!(text.trim_end().ends_with(&"=".repeat(RULE_WIDTH)));
        assert!(text.contains(SUCCESS_LINE));
    }

    #[test]
    fn test_prices_are_not_double_prefixed() {
        let record = QuoteRecord::fallback("TSLA");
        let text = render_dashboard(&record, None);

        assert!(text.contains("$150.25"));
        assert!(!text.contains("$$"));
    }

    #[test]
    fn test_connection_report_lines() {
        let report = ConnectionReport::from(vec![
            ConnectionProbe {
                ticker: "AAPL".to_string(),
                status: ConnectionStatus::Success {
                    company: "Apple Inc".to_string(),
                },
            },
            ConnectionProbe {
                ticker: "MSFT".to_string(),
                status: ConnectionStatus::Error {
                    error: "Network error: timed out".to_string(),
                },
            },
        ]);

        let text = render_connection_report(&report);
        assert!(text.contains("✅ AAPL: Apple Inc"));
        assert!(text.contains("❌ MSFT: Network error: timed out"));
    }
}
