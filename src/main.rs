//! HTTP server for the Duty Roster Engine.
//!
//! Environment:
//!
//! - `DUTY_ROSTER_CONFIG`: configuration directory (default `./config/default`)
//! - `DUTY_ROSTER_ADDR`: listen address (default `127.0.0.1:3000`)
//! - `RUST_LOG`: log filter (default `info`)

use std::env;

use duty_roster::api::{AppState, create_router};
use duty_roster::config::ConfigLoader;
use duty_roster::logging;
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config_dir = env::var("DUTY_ROSTER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let addr = env::var("DUTY_ROSTER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into());

    let loader = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        members = loader.config().roster().len(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(loader));
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, version = env!("CARGO_PKG_VERSION"), "Serving");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
