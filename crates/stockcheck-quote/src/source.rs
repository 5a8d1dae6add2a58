//! The seam between the dashboards and the quote provider

use crate::error::Result;
use crate::record::QuoteRecord;
use async_trait::async_trait;

/// Something that can produce a live quote record for a ticker
///
/// [`crate::FinvizClient`] is the production implementation. The
/// dashboards only see this trait, which keeps the fallback path testable
/// without network access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch and parse everything the provider knows about `ticker`
    ///
    /// Returns an error for unknown tickers, transport failures and
    /// unparsable pages alike. Callers decide what to do with it.
    async fn fetch(&self, ticker: &str) -> Result<QuoteRecord>;

    /// URL of a chart image for `ticker`, when the provider has one
    fn chart_url(&self, ticker: &str) -> Option<String>;
}
