//! The four static dashboard charts
//!
//! The series are placeholders and never depend on fetched data. Only the
//! titles carry the ticker.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
const PALETTE: [&str; 4] = ["#17BECF", "#FF6B6B", "#32CD32", "#FFD700"];
const CHART_HEIGHT: u32 = 400;
const CHART_TEMPLATE: &str = "plotly_white";

/// Chart type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// One static chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Key in the dashboard payload (`price_chart`, ...)
    pub id: String,
    pub kind: ChartKind,
    pub title: String,
    /// Category axis labels or pie slice labels
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// One colour for the whole trace, or one per category
    pub colors: Vec<String>,
    /// Legend name for line and bar traces
    pub trace_name: Option<String>,
    pub line_width: Option<u32>,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub height: u32,
}

/// Plotly figure JSON as consumed by `Plotly.newPlot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyFigure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Chart {
    fn new(id: &str, kind: ChartKind, title: String, labels: &[&str], values: &[f64]) -> Self {
        Self {
            id: id.to_string(),
            kind,
            title,
            labels: labels.iter().map(ToString::to_string).collect(),
            values: values.to_vec(),
            colors: Vec::new(),
            trace_name: None,
            line_width: None,
            x_title: None,
            y_title: None,
            height: CHART_HEIGHT,
        }
    }

    fn colors(mut self, colors: &[&str]) -> Self {
        self.colors = colors.iter().map(ToString::to_string).collect();
        self
    }

    fn axes(mut self, x: &str, y: &str) -> Self {
        self.x_title = Some(x.to_string());
        self.y_title = Some(y.to_string());
        self
    }

    /// Render as a Plotly figure
    pub fn to_plotly(&self) -> PlotlyFigure {
        let color: Value = match self.colors.as_slice() {
            [single] => json!(single),
            many => json!(many),
        };

        let trace = match self.kind {
            ChartKind::Line => json!({
                "type": "scatter",
                "mode": "lines+markers",
                "name": self.trace_name,
                "x": self.labels,
                "y": self.values,
                "line": { "color": color, "width": self.line_width.unwrap_or(2) },
            }),
            ChartKind::Bar => {
                let mut bar = json!({
                    "type": "bar",
                    "x": self.labels,
                    "y": self.values,
                    "marker": { "color": color },
                });
                if let Some(name) = &self.trace_name {
                    bar["name"] = json!(name);
                }
                bar
            }
            ChartKind::Pie => json!({
                "type": "pie",
                "labels": self.labels,
                "values": self.values,
                "marker": { "colors": self.colors },
            }),
        };

        let mut layout = json!({
            "title": { "text": self.title },
            "template": CHART_TEMPLATE,
            "height": self.height,
        });
        if let (Some(x), Some(y)) = (&self.x_title, &self.y_title) {
            layout["xaxis"] = json!({ "title": { "text": x } });
            layout["yaxis"] = json!({ "title": { "text": y } });
        }

        PlotlyFigure {
            data: vec![trace],
            layout,
        }
    }
}

/// A figure tagged with its chart id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFigure {
    pub id: String,
    pub figure: PlotlyFigure,
}

/// The dashboard's charts in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charts(Vec<Chart>);

impl Charts {
    pub fn get(&self, id: &str) -> Option<&Chart> {
        self.0.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plotly figures in display order
    pub fn figures(&self) -> Vec<ChartFigure> {
        self.0
            .iter()
            .map(|c| ChartFigure {
                id: c.id.clone(),
                figure: c.to_plotly(),
            })
            .collect()
    }

    /// Plotly figures keyed by chart id
    pub fn to_figures(&self) -> BTreeMap<String, PlotlyFigure> {
        self.0
            .iter()
            .map(|c| (c.id.clone(), c.to_plotly()))
            .collect()
    }
}

/// Build the price, volume, valuation and performance charts
pub fn create_charts(ticker: &str) -> Charts {
    let mut price = Chart::new(
        "price_chart",
        ChartKind::Line,
        format!("{ticker} Price Performance (6 Months)"),
        &MONTHS,
        &[100.0, 105.0, 102.0, 110.0, 108.0, 115.0],
    )
    .colors(&PALETTE[..1])
    .axes("Month", "Price ($)");
    price.trace_name = Some("Stock Price".to_string());
    price.line_width = Some(3);

    let mut volume = Chart::new(
        "volume_chart",
        ChartKind::Bar,
        format!("{ticker} Trading Volume (6 Months)"),
        &MONTHS,
        &[1_000_000.0, 1_200_000.0, 900_000.0, 1_500_000.0, 1_300_000.0, 1_100_000.0],
    )
    .colors(&PALETTE[1..2])
    .axes("Month", "Volume");
    volume.trace_name = Some("Volume".to_string());

    let valuation = Chart::new(
        "valuation_chart",
        ChartKind::Bar,
        format!("{ticker} Valuation Ratios"),
        &["P/E", "P/B", "P/S", "PEG"],
        &[25.5, 8.2, 6.1, 1.8],
    )
    .colors(&PALETTE)
    .axes("Ratio", "Value");

    let performance = Chart::new(
        "performance_chart",
        ChartKind::Pie,
        format!("{ticker} Performance Metrics Distribution"),
        &["ROE", "ROI", "ROA", "Profit Margin"],
        &[32.5, 28.3, 18.7, 22.4],
    )
    .colors(&PALETTE);

    Charts(vec![price, volume, valuation, performance])
}
