// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are public — the analyzer serves
// read-mostly derived data, no funds are at stake.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analysis::{analyze, AnalysisReport};
use crate::app_state::AppState;
use crate::market_data::{retain_last, Bar};
use crate::summary::MarketSummary;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/coins", get(coins))
        .route("/api/v1/analysis/:coin_id", get(analysis))
        .route("/api/v1/params", get(get_params))
        .route("/api/v1/params", post(set_params))
        .route("/api/v1/errors", get(errors))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Coin search (autocomplete)
// =============================================================================

#[derive(Deserialize)]
struct CoinQuery {
    #[serde(default)]
    q: String,
}

async fn coins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CoinQuery>,
) -> impl IntoResponse {
    let matches = state.registry.search(&query.q);
    Json(matches)
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Deserialize)]
struct AnalysisQuery {
    /// Trailing window, passed through to the provider ("1", "7", ..., "max").
    days: Option<String>,
    /// Maximum number of bars retained for analysis.
    limit: Option<usize>,
}

#[derive(Serialize)]
struct AnalysisResponse {
    coin_id: String,
    vs_currency: String,
    days: String,
    bars: Vec<Bar>,
    report: AnalysisReport,
    summary: Option<MarketSummary>,
    /// The summary rendered as the multi-line text digest.
    digest: Option<String>,
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let (vs_currency, default_days, default_limit, params) = {
        let config = state.config.read();
        (
            config.vs_currency.clone(),
            config.default_days.clone(),
            config.default_limit,
            config.indicator_params.clone(),
        )
    };
    let days = query.days.unwrap_or(default_days);
    let limit = query.limit.unwrap_or(default_limit);

    let bars = match state
        .market_client
        .fetch_ohlc(&coin_id, &vs_currency, &days)
        .await
    {
        Ok(bars) => bars,
        Err(e) => {
            let message = format!("OHLC fetch failed for {coin_id}: {e:#}");
            warn!(coin_id = %coin_id, error = %e, "OHLC fetch failed");
            state.push_error(message.clone());
            return Err((
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": message })),
            ));
        }
    };

    if bars.is_empty() {
        let message = format!("no OHLC data returned for {coin_id}");
        state.push_error(message.clone());
        return Err((
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": message })),
        ));
    }

    // Only the most recent bars are analyzed.
    let bars = retain_last(bars, limit);

    let report = analyze(&bars, &params);
    let summary = MarketSummary::project(&bars, &report);
    let digest = summary.as_ref().map(|s| s.to_string());

    info!(
        coin_id = %coin_id,
        bars = bars.len(),
        signals = report.signals.len(),
        "analysis computed"
    );
    state.increment_version();

    Ok(Json(AnalysisResponse {
        coin_id,
        vs_currency,
        days,
        bars,
        report,
        summary,
        digest,
    }))
}

// =============================================================================
// Indicator parameters
// =============================================================================

async fn get_params(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let params = state.config.read().indicator_params.clone();
    Json(params)
}

#[derive(Deserialize)]
struct ParamsUpdate {
    #[serde(default)]
    macd_fast: Option<usize>,
    #[serde(default)]
    macd_slow: Option<usize>,
    #[serde(default)]
    macd_signal: Option<usize>,
    #[serde(default)]
    rsi_period: Option<usize>,
    #[serde(default)]
    atr_period: Option<usize>,
    #[serde(default)]
    sma_period: Option<usize>,
    #[serde(default)]
    trend_fast: Option<usize>,
    #[serde(default)]
    trend_slow: Option<usize>,
    #[serde(default)]
    warmup_floor: Option<usize>,
    #[serde(default)]
    rsi_buy_floor: Option<f64>,
    #[serde(default)]
    rsi_sell_ceiling: Option<f64>,
}

async fn set_params(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ParamsUpdate>,
) -> impl IntoResponse {
    let mut config = state.config.write();
    let mut changes = Vec::new();

    macro_rules! apply_param {
        ($field:ident) => {
            if let Some(val) = update.$field {
                if config.indicator_params.$field != val {
                    changes.push(format!(
                        "{}: {} -> {}",
                        stringify!($field),
                        config.indicator_params.$field,
                        val
                    ));
                    config.indicator_params.$field = val;
                }
            }
        };
    }

    apply_param!(macd_fast);
    apply_param!(macd_slow);
    apply_param!(macd_signal);
    apply_param!(rsi_period);
    apply_param!(atr_period);
    apply_param!(sma_period);
    apply_param!(trend_fast);
    apply_param!(trend_slow);
    apply_param!(warmup_floor);
    apply_param!(rsi_buy_floor);
    apply_param!(rsi_sell_ceiling);

    let params = config.indicator_params.clone();
    let config_clone = config.clone();
    drop(config);

    if !changes.is_empty() {
        info!(changes = ?changes, "indicator params updated");

        // Save to disk (best-effort).
        if let Err(e) = config_clone.save("analyzer_config.json") {
            warn!(error = %e, "failed to save indicator params to disk");
        }
        state.increment_version();
    }

    Json(serde_json::json!({
        "params": params,
        "changes": changes,
    }))
}

// =============================================================================
// Error log
// =============================================================================

async fn errors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let errors = state.recent_errors.read().clone();
    Json(errors)
}
