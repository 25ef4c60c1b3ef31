//! Call Screener — Binary Entrypoint
//! Boots the Axum HTTP server: loads the configuration snapshot, builds the
//! routing table, wires routes and middleware.
//!
//! Invalid configuration aborts here, before the first call is answered.

mod api;
mod call;
mod checks;
mod config;
mod engine;
mod history;
mod metrics;
mod reputation;
mod response;
mod routing;
mod verdict;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ScreenerConfig;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SCREENER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SCREENER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("screener=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables SCREENER_CONFIG_PATH from .env so config.rs can pick it up.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // --- Load the immutable configuration snapshot ---
    let cfg = ScreenerConfig::from_toml().expect("Failed to load screener config");
    let state = api::AppState::from_config(cfg).expect("Failed to build routing table");

    let prometheus = metrics::Metrics::init();

    let router = api::create_router(state).merge(prometheus.router());

    Ok(router.into())
}
