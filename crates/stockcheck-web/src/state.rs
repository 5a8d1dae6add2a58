//! Shared application state

use crate::error::Result;
use crate::templates::Templates;
use std::sync::Arc;
use stockcheck_quote::{
    DashboardService, FinvizClient, LookupConfig, QuoteConfig, QuoteSource, TickerLookup,
};

/// State shared by every handler; immutable after start-up
#[derive(Clone)]
pub struct AppState {
    pub service: DashboardService,
    pub lookup: TickerLookup,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(source: Arc<dyn QuoteSource>, lookup: TickerLookup) -> Result<Self> {
        Ok(Self {
            service: DashboardService::new(source),
            lookup,
            templates: Arc::new(Templates::new()?),
        })
    }

    /// Finviz client and OpenRouter lookup configured from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let client = FinvizClient::new(QuoteConfig::from_env()?)?;
        let lookup = TickerLookup::from_config(&LookupConfig::from_env());
        Ok(Self::new(Arc::new(client), lookup)?)
    }
}
