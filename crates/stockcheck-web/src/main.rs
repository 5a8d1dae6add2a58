//! stockcheck web dashboard server

use anyhow::Result;
use stockcheck_web::{AppState, ServerConfig, router};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    stockcheck_utils::init_tracing();
    stockcheck_utils::load_dotenv();

    let app = stockcheck_utils::Config::from_env();
    info!("Starting {} web dashboard ({})", app.app_name, app.environment);

    let config = ServerConfig::from_env()?;
    let state = AppState::from_env()?;
    if !state.lookup.is_configured() {
        info!("Company name lookup disabled");
    }

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Stock dashboard listening on http://{}", config.addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
