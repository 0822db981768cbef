// =============================================================================
// stock-lens: Main Entry Point
// =============================================================================
//
// Technical-analysis service: fetches daily history for a ticker, computes
// moving averages, Bollinger Bands, RSI and OBV, and serves chart-ready
// reports over HTTP.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod finnhub;
mod i18n;
mod indicators;
mod market_data;
mod report;
mod runtime_config;
mod ticker_lookup;
mod types;
mod yahoo;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "stock_lens.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("stock-lens starting up");

    // ── 2. Configuration ─────────────────────────────────────────────────
    let mut config = match RuntimeConfig::load(CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            let defaults = RuntimeConfig::default();
            if !Path::new(CONFIG_PATH).exists() {
                if let Err(e) = defaults.save(CONFIG_PATH) {
                    warn!(error = %e, "Failed to write default config");
                }
            }
            defaults
        }
    };
    config.apply_env(|key| std::env::var(key).ok());
    config.normalise();

    if config.finnhub_api_key.is_none() {
        warn!("FINNHUB_API_KEY not set, news section disabled");
    }
    info!(
        default_months = config.default_months,
        default_language = %config.default_language,
        indicators = ?config.indicators,
        "configuration ready"
    );

    let bind_addr = config.bind_addr.clone();

    // ── 3. Shared state & HTTP server ────────────────────────────────────
    let state = Arc::new(AppState::new(config)?);
    let app = api::rest::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    // ── 4. Serve until Ctrl+C ────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received, stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("stock-lens shut down complete.");
    Ok(())
}
