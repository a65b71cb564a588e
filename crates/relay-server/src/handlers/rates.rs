//! Rate, best-quote and order handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use relay_core::{order, Direction, Quote, RelayError, DEFAULT_PAIR};
use serde::{Deserialize, Serialize};

use super::{api_error, ok, relay_error, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    pub pair: Option<String>,
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BestQuery {
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesResponse {
    pub rates: Vec<Quote>,
    pub best_provider: Option<Quote>,
    pub timestamp: DateTime<Utc>,
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub providers_queried: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestResponse {
    pub best_provider: Quote,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub enabled: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub providers: Vec<ProviderStatus>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let providers = state
        .aggregator
        .providers()
        .iter()
        .map(|p| ProviderStatus {
            name: p.name.clone(),
            enabled: p.enabled,
        })
        .collect();

    Json(HealthResponse {
        success: true,
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        providers,
    })
}

/// Aggregate all providers and select the best quote
pub async fn get_rates(
    State(state): State<AppState>,
    Query(query): Query<RatesQuery>,
) -> ApiResult<RatesResponse> {
    let direction = Direction::parse_or_default(query.direction.as_deref()).map_err(|e| relay_error(&e))?;
    let pair = query
        .pair
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAIR.into());

    tracing::info!(pair = %pair, direction = %direction, "Rates request");

    let result = state.aggregator.aggregate(&pair, direction).await;

    for quote in &result.quotes {
        tracing::info!(provider = %quote.provider, rate = ?quote.rate(direction), "{} rate", direction);
    }

    Ok(ok(RatesResponse {
        rates: result.quotes,
        best_provider: result.best_quote,
        timestamp: result.aggregated_at,
        currency_pair: result.requested_pair,
        direction: result.requested_direction,
        providers_queried: result.providers_queried,
    }))
}

/// Cached best quote for a direction
pub async fn get_best(State(state): State<AppState>, Query(query): Query<BestQuery>) -> ApiResult<BestResponse> {
    let direction = Direction::parse_or_default(query.direction.as_deref()).map_err(|e| relay_error(&e))?;

    let best = state.cache.best(direction).ok_or_else(|| {
        tracing::debug!(direction = %direction, "{}", RelayError::NoQuotesAvailable);
        api_error(StatusCode::NOT_FOUND, "No rates available. Please fetch rates first.", None)
    })?;

    Ok(ok(BestResponse {
        best_provider: best,
        direction,
        timestamp: Utc::now(),
    }))
}

/// Acknowledge an order against the cached best provider
pub async fn submit_order(
    State(state): State<AppState>,
    Json(payload): Json<order::OrderRequest>,
) -> ApiResult<order::OrderAck> {
    order::place_order(&state.cache, &payload)
        .map(ok)
        .map_err(|e| {
            tracing::warn!(provider = %payload.provider, error = %e, "Order rejected");
            match e {
                RelayError::InvalidOrder(reason) => api_error(StatusCode::BAD_REQUEST, reason, None),
                other => relay_error(&other),
            }
        })
}
