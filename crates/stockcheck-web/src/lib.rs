//! Web dashboard for stockcheck
//!
//! An axum application with a ticker form, a tabbed dashboard page and a
//! small JSON API. Every page goes through the same fetch-or-fallback path
//! as the terminal dashboard, so a dashboard always renders.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod templates;

pub use config::ServerConfig;
pub use error::{Result, WebError};
pub use routes::router;
pub use state::AppState;
pub use templates::Templates;
