// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Handlers validate the request at the
// boundary, hand typed values to the calculation modules and serialise the
// result.  Errors raised by the core map to HTTP 400 with `{ "error": ... }`.
//
// CORS is permissive; the service is meant to sit behind a dashboard.
// =============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Json, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::app_state::AppState;
use crate::cache::Cache;
use crate::calculations::{
    analyze_real_yield, consensus_by_timeframe, consensus_price, summarize_forecasts, tag_named,
    yield_spread, BankForecast, ForecastSummary, InflationReading, RealYieldAnalysis, Timeframe,
    YieldPair, YieldSpread,
};
use crate::correlation::{rank_correlations, AssetSeries, CorrelationReport};
use crate::cot::{self, CotAnalysis, CotSnapshot, PositioningHistory};
use crate::error::AnalyticsError;
use crate::risk_index::RiskIndex;
use crate::scenario::{calculate_scenario_with, ScenarioInput, ScenarioPreset, ScenarioResult};
use crate::seasonality::{
    current_month_outlook, monthly_outlooks, quarterly_seasonality, MonthOutlook,
    QuarterlySeasonality,
};
use crate::technical::{analyze_smc, detect_zones, Candle, SmcAnalysis, ZoneSet};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(err: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": err.to_string() })),
    )
}

/// JSON body extractor whose rejections use the same 400 `{ "error" }` shape
/// as core errors.
struct ApiJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(status = %rejection.status(), error = %rejection.body_text(), "rejected request body");
                Err(bad_request(rejection.body_text()))
            }
        }
    }
}

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
        // ── Fundamentals ────────────────────────────────────────────
        .route("/api/v1/forecasts/consensus", post(forecast_consensus))
        .route("/api/v1/inflation/tag", post(inflation_tag))
        .route("/api/v1/yields/real", post(yields_real))
        .route("/api/v1/yields/spread", post(yields_spread))
        // ── Positioning & sentiment ─────────────────────────────────
        .route("/api/v1/cot/analyze", post(cot_analyze))
        .route("/api/v1/risk-index", post(risk_index))
        .route("/api/v1/seasonality", get(seasonality))
        // ── Scenario ────────────────────────────────────────────────
        .route("/api/v1/scenario", post(scenario))
        .route("/api/v1/scenario/presets", get(scenario_presets))
        // ── Technical / cross-asset ─────────────────────────────────
        .route("/api/v1/technical/zones", post(technical_zones))
        .route("/api/v1/technical/smc", post(technical_smc))
        .route("/api/v1/correlation", post(correlation))
        // ── Middleware & State ───────────────────────────────────────
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .layer(cors)
        .with_state(state)
}

async fn count_requests(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let total = state.record_request();
    debug!(
        method = %request.method(),
        path = %request.uri().path(),
        total,
        "request"
    );
    next.run(request).await
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    requests_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        requests_served: state.requests_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Bank forecasts
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsensusRequest {
    #[serde(default)]
    forecasts: Vec<serde_json::Value>,
    #[serde(default)]
    current_price: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConsensusResponse {
    consensus: Option<f64>,
    by_timeframe: BTreeMap<Timeframe, f64>,
    summary: Option<ForecastSummary>,
    accepted: usize,
    rejected: usize,
}

async fn forecast_consensus(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ConsensusRequest>,
) -> impl IntoResponse {
    let total = req.forecasts.len();
    let forecasts: Vec<BankForecast> = req
        .forecasts
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<BankForecast>(raw) {
            Ok(forecast) => match forecast.validate() {
                Ok(()) => Some(forecast),
                Err(e) => {
                    debug!(bank = %forecast.bank_name, error = %e, "dropping invalid forecast");
                    None
                }
            },
            Err(e) => {
                debug!(error = %e, "dropping malformed forecast");
                None
            }
        })
        .collect();

    let spot = req
        .current_price
        .unwrap_or_else(|| state.runtime_config.read().default_gold_price);

    Json(ConsensusResponse {
        consensus: consensus_price(&forecasts),
        by_timeframe: consensus_by_timeframe(&forecasts),
        summary: summarize_forecasts(&forecasts, spot),
        accepted: forecasts.len(),
        rejected: total - forecasts.len(),
    })
}

// =============================================================================
// Inflation & yields
// =============================================================================

#[derive(Deserialize)]
struct InflationRequest {
    #[serde(rename = "type")]
    kind: String,
    value: f64,
    #[serde(default)]
    previous: Option<f64>,
}

async fn inflation_tag(ApiJson(req): ApiJson<InflationRequest>) -> Result<Json<InflationReading>, ApiError> {
    tag_named(&req.kind, req.value, req.previous)
        .map(Json)
        .map_err(bad_request)
}

async fn yields_real(ApiJson(pair): ApiJson<YieldPair>) -> Result<Json<RealYieldAnalysis>, ApiError> {
    analyze_real_yield(pair).map(Json).map_err(bad_request)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadRequest {
    long_yield: f64,
    short_yield: f64,
}

async fn yields_spread(ApiJson(req): ApiJson<SpreadRequest>) -> Result<Json<YieldSpread>, ApiError> {
    yield_spread(req.long_yield, req.short_yield)
        .map(Json)
        .map_err(bad_request)
}

// =============================================================================
// COT positioning
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CotRequest {
    current: CotSnapshot,
    /// Prior weeks, oldest first; the current week is appended.
    #[serde(default)]
    history: Vec<CotSnapshot>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CotResponse {
    #[serde(flatten)]
    analysis: CotAnalysis,
    positioning: Option<PositioningHistory>,
}

async fn cot_analyze(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CotRequest>,
) -> impl IntoResponse {
    let threshold = state.runtime_config.read().cot_overcrowded_threshold;
    let analysis = cot::analyze(&req.current, threshold);

    if let Some(alert) = &analysis.alert {
        info!(severity = ?alert.severity, message = %alert.message, "COT alert raised");
    }

    let mut weeks = req.history;
    weeks.push(req.current);

    Json(CotResponse {
        analysis,
        positioning: cot::positioning_history(&weeks),
    })
}

// =============================================================================
// Geopolitical risk index (cached)
// =============================================================================

#[derive(Deserialize)]
struct RiskRequest {
    #[serde(default)]
    headlines: Vec<String>,
}

async fn risk_index(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RiskRequest>,
) -> Json<RiskIndex> {
    if let Some(cached) = state.risk_cache.get(&req.headlines) {
        debug!(headlines = req.headlines.len(), "risk index served from cache");
        return Json(cached);
    }

    let index = state.risk_scorer.score(&req.headlines);
    info!(
        score = index.score,
        fear_level = %index.fear_level,
        headlines = index.headline_count,
        "risk index computed"
    );
    state.risk_cache.insert(req.headlines, index.clone());
    Json(index)
}

// =============================================================================
// Seasonality
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeasonalityResponse {
    current: MonthOutlook,
    months: Vec<MonthOutlook>,
    quarters: Vec<QuarterlySeasonality>,
}

async fn seasonality() -> impl IntoResponse {
    Json(SeasonalityResponse {
        current: current_month_outlook(&chrono::Utc::now()),
        months: monthly_outlooks(),
        quarters: quarterly_seasonality(),
    })
}

// =============================================================================
// Scenario simulator
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioRequest {
    /// When set, the preset's shocks replace the explicit ones.
    #[serde(default)]
    preset: Option<ScenarioPreset>,
    #[serde(default)]
    current_price: Option<f64>,
    #[serde(flatten)]
    input: ScenarioInput,
}

async fn scenario(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ScenarioRequest>,
) -> Result<Json<ScenarioResult>, ApiError> {
    let (table, default_price) = {
        let config = state.runtime_config.read();
        (config.elasticities, config.default_gold_price)
    };

    let price = match req.current_price {
        Some(p) => {
            AnalyticsError::ensure_finite("currentPrice", p).map_err(bad_request)?;
            if p < 0.0 {
                return Err(bad_request(AnalyticsError::NegativeValue {
                    field: "currentPrice",
                }));
            }
            p
        }
        None => default_price,
    };

    let input = req.preset.map(ScenarioPreset::input).unwrap_or(req.input);
    let result = calculate_scenario_with(&table, &input, price);
    debug!(
        preset = ?req.preset,
        projected = result.projected_price,
        confidence = result.confidence,
        "scenario simulated"
    );
    Ok(Json(result))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetEntry {
    id: ScenarioPreset,
    label: &'static str,
    input: ScenarioInput,
}

async fn scenario_presets() -> impl IntoResponse {
    let presets: Vec<PresetEntry> = ScenarioPreset::ALL
        .iter()
        .map(|&preset| PresetEntry {
            id: preset,
            label: preset.label(),
            input: preset.input(),
        })
        .collect();
    Json(presets)
}

// =============================================================================
// Technical structure
// =============================================================================

#[derive(Deserialize)]
struct CandleRequest {
    candles: Vec<Candle>,
    #[serde(default)]
    lookback: Option<usize>,
}

async fn technical_zones(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CandleRequest>,
) -> Json<ZoneSet> {
    let lookback = req
        .lookback
        .unwrap_or_else(|| state.runtime_config.read().technical.zone_lookback);

    Json(detect_zones(&req.candles, lookback))
}

async fn technical_smc(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CandleRequest>,
) -> Json<SmcAnalysis> {
    let mut params = state.runtime_config.read().technical.smc();
    if let Some(lookback) = req.lookback {
        params.lookback = lookback;
    }
    Json(analyze_smc(&req.candles, &params))
}

// =============================================================================
// Cross-asset correlation (cached)
// =============================================================================

#[derive(Serialize, Deserialize)]
struct CorrelationRequest {
    gold: Vec<f64>,
    assets: Vec<AssetSeries>,
    #[serde(default)]
    window: Option<usize>,
}

async fn correlation(
    State(state): State<Arc<AppState>>,
    ApiJson(mut req): ApiJson<CorrelationRequest>,
) -> Result<Json<CorrelationReport>, ApiError> {
    let window = *req
        .window
        .get_or_insert_with(|| state.runtime_config.read().correlation_window);

    let key = serde_json::to_string(&req).map_err(bad_request)?;
    let report = state
        .correlation_cache
        .get_or_insert_with(key, || rank_correlations(&req.gold, &req.assets, window));
    Ok(Json(report))
}
