// =============================================================================
// Borealis Market Analyzer — Main Entry Point
// =============================================================================
//
// Fetches OHLC bars from CoinGecko on demand, runs the indicator/signal
// pipeline over them, and serves the derived series, signal events, and
// summary digest over a small REST API.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod indicators;
mod market_data;
mod runtime_config;
mod series;
mod signals;
mod summary;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::CoinGeckoClient;
use crate::runtime_config::AnalyzerConfig;

/// Path of the on-disk configuration file.
const CONFIG_PATH: &str = "analyzer_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Borealis Market Analyzer — Starting Up           ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = AnalyzerConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AnalyzerConfig::default()
    });

    // Override quote currency from env if available.
    if let Ok(vs) = std::env::var("BOREALIS_VS_CURRENCY") {
        let vs = vs.trim().to_lowercase();
        if !vs.is_empty() {
            config.vs_currency = vs;
        }
    }

    info!(
        vs_currency = %config.vs_currency,
        default_days = %config.default_days,
        default_limit = config.default_limit,
        "Analyzer configured"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let market_client = CoinGeckoClient::new();
    let state = Arc::new(AppState::new(config, market_client));

    // ── 3. Coin registry refresh task ────────────────────────────────────
    let registry_state = state.clone();
    tokio::spawn(async move {
        loop {
            let (vs_currency, registry_size) = {
                let config = registry_state.config.read();
                (config.vs_currency.clone(), config.registry_size)
            };

            match registry_state
                .market_client
                .top_coins(&vs_currency, registry_size)
                .await
            {
                Ok(coins) => {
                    info!(count = coins.len(), "coin registry refreshed");
                    registry_state.registry.replace(coins);
                    registry_state.increment_version();
                    tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
                }
                Err(e) => {
                    error!(error = %e, "Coin registry refresh failed — retrying in 60s");
                    registry_state.push_error(format!("coin registry refresh failed: {e:#}"));
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                }
            }
        }
    });

    // ── 4. Start the API server ──────────────────────────────────────────
    let api_state = state.clone();
    let bind_addr =
        std::env::var("BOREALIS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let bind_addr_clone = bind_addr.clone();

    tokio::spawn(async move {
        let app = api::rest::router(api_state);
        let listener = tokio::net::TcpListener::bind(&bind_addr_clone)
            .await
            .expect("Failed to bind API server");
        info!(addr = %bind_addr_clone, "API server listening");
        axum::serve(listener, app)
            .await
            .expect("API server failed");
    });

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");

    if let Err(e) = state.config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save analyzer config on shutdown");
    }

    info!("Borealis Market Analyzer shut down complete.");
    Ok(())
}
