//! Fetch-or-fallback dashboard service

use crate::charts::{PlotlyFigure, create_charts};
use crate::record::{DataOrigin, QuoteRecord};
use crate::source::QuoteSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Tickers probed by the connection test
pub const PROBE_TICKERS: [&str; 5] = ["AAPL", "MSFT", "GOOGL", "TSLA", "AMZN"];

/// Payload of the dashboard JSON API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    /// Always `true`; failed fetches are replaced by the fallback record
    pub success: bool,
    pub ticker: String,
    pub source: DataOrigin,
    pub data: BTreeMap<String, String>,
    pub charts: BTreeMap<String, PlotlyFigure>,
    pub generated_at: DateTime<Utc>,
}

/// Outcome of probing one ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConnectionStatus {
    Success { company: String },
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProbe {
    pub ticker: String,
    #[serde(flatten)]
    pub status: ConnectionStatus,
}

impl ConnectionProbe {
    pub fn is_success(&self) -> bool {
        matches!(self.status, ConnectionStatus::Success { .. })
    }
}

/// Probe results in probe order
///
/// Serialises as a `ticker → status` map that keeps that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionReport {
    probes: Vec<ConnectionProbe>,
}

impl ConnectionReport {
    pub fn probes(&self) -> &[ConnectionProbe] {
        &self.probes
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionProbe> {
        self.probes.iter()
    }

    pub fn success_count(&self) -> usize {
        self.probes.iter().filter(|p| p.is_success()).count()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl From<Vec<ConnectionProbe>> for ConnectionReport {
    fn from(probes: Vec<ConnectionProbe>) -> Self {
        Self { probes }
    }
}

impl Serialize for ConnectionReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.probes.iter().map(|p| (&p.ticker, &p.status)))
    }
}

/// Shared fetch path for every front-end
///
/// Errors from the quote source never reach the caller: they are logged and
/// replaced by [`QuoteRecord::fallback`].
#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn QuoteSource>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn QuoteSource> {
        &self.source
    }

    /// Fetch a record, substituting the fallback on any error
    pub async fn fetch_company_data(&self, ticker: &str) -> QuoteRecord {
        self.fetch_company_data_named(ticker, None).await
    }

    /// Like [`Self::fetch_company_data`], with a typed-in company name used
    /// in the fallback's company line
    #[instrument(skip(self))]
    pub async fn fetch_company_data_named(
        &self,
        ticker: &str,
        company_name: Option<&str>,
    ) -> QuoteRecord {
        match self.source.fetch(ticker).await {
            Ok(record) => {
                info!("Fetched {} fields for {}", record.len(), ticker);
                record
            }
            Err(e) => {
                warn!("Error fetching data for {}: {}. Using fallback data.", ticker, e);
                QuoteRecord::fallback_named(ticker, company_name)
            }
        }
    }

    /// Record plus the four charts, as served by the JSON API
    pub async fn get_dashboard_data(&self, ticker: &str) -> DashboardData {
        let record = self.fetch_company_data(ticker).await;
        Self::dashboard_from_record(record)
    }

    /// Assemble the payload for an already fetched record
    pub fn dashboard_from_record(record: QuoteRecord) -> DashboardData {
        let charts = create_charts(record.ticker()).to_figures();

        DashboardData {
            success: true,
            ticker: record.ticker().to_string(),
            source: record.origin(),
            data: record.fields().clone(),
            charts,
            generated_at: Utc::now(),
        }
    }

    /// Probe [`PROBE_TICKERS`] one after another, without fallback
    #[instrument(skip(self))]
    pub async fn test_api_connection(&self) -> ConnectionReport {
        let mut results = Vec::with_capacity(PROBE_TICKERS.len());

        for ticker in PROBE_TICKERS {
            let status = match self.source.fetch(ticker).await {
                Ok(record) => ConnectionStatus::Success {
                    company: record.company().to_string(),
                },
                Err(e) => {
                    warn!("Connection probe for {} failed: {}", ticker, e);
                    ConnectionStatus::Error {
                        error: e.to_string(),
                    }
                }
            };
            results.push(ConnectionProbe {
                ticker: ticker.to_string(),
                status,
            });
        }

        let report = ConnectionReport::from(results);
        info!(
            "Connection test: {}/{} tickers reachable",
            report.success_count(),
            report.len()
        );
        report
    }
}
