//! Shared utilities for stockcheck
//!
//! This crate provides common functionality used across the stockcheck
//! workspace: logging setup and environment-driven configuration.

pub mod config;
pub mod logging;

pub use config::{Config, env_or, env_parse, load_dotenv};
pub use logging::{init_tracing, init_tracing_with};
