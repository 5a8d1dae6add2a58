//! Quote fetching and dashboard building blocks for stockcheck
//!
//! Every stockcheck front-end does the same thing: take a ticker (or a
//! company name resolved to one), fetch the provider's quote page, fall back
//! to a canned record when that fails, and render the result next to four
//! static charts. This crate holds that shared path:
//!
//! - [`api::FinvizClient`]: fetches and parses Finviz quote pages
//! - [`DashboardService`]: fetch-or-fallback, dashboard payloads, connection probe
//! - [`charts`]: the four fixed placeholder charts
//! - [`panels`]: labeled rows the front-ends render
//! - [`TickerLookup`]: company name to ticker through an LLM
//!
//! # Example
//!
//! ```rust,ignore
//! use stockcheck_quote::{DashboardService, FinvizClient, QuoteConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = FinvizClient::new(QuoteConfig::from_env()?)?;
//!     let service = DashboardService::new(Arc::new(client));
//!
//!     let dashboard = service.get_dashboard_data("AAPL").await;
//!     println!("{}", dashboard.data["Company"]);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod lookup;
pub mod panels;
pub mod record;
pub mod source;
pub mod validate;

// Re-export main types for convenience
pub use api::FinvizClient;
pub use charts::{Chart, ChartFigure, ChartKind, Charts, PlotlyFigure, create_charts};
pub use config::{LookupConfig, QuoteConfig};
pub use dashboard::{
    ConnectionProbe, ConnectionReport, ConnectionStatus, DashboardData, DashboardService,
};
pub use error::{Result, StockError};
pub use lookup::{TickerLookup, TickerLookupResult};
pub use record::{DataOrigin, NOT_AVAILABLE, QuoteRecord};
pub use source::QuoteSource;
pub use validate::{TickerError, normalize_ticker, validate_ticker};
