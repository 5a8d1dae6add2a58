//! Server configuration

use crate::error::{Result, WebError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Bind address used when `STOCKCHECK_ADDR` is unset
pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
        }
    }
}

impl ServerConfig {
    /// Read `STOCKCHECK_ADDR`, defaulting to `0.0.0.0:5000`
    pub fn from_env() -> Result<Self> {
        let raw = stockcheck_utils::env_or("STOCKCHECK_ADDR", DEFAULT_ADDR);
        Self::parse(&raw)
    }

    pub fn parse(addr: &str) -> Result<Self> {
        let addr = addr
            .trim()
            .parse()
            .map_err(|e| WebError::Config(format!("invalid listen address '{addr}': {e}")))?;
        Ok(Self { addr })
    }
}
