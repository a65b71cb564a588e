//! Price, history, comparison and coin board handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use relay_core::market::{self, AssetType, CoinListing, HistoryPoint, AVAILABLE_PAIRS};
use relay_core::{select_best, Direction, Quote, RelayError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ok, relay_error, ApiError, ApiResult, Envelope, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DirectionQuery {
    #[serde(rename = "type")]
    pub direction: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub hours: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinsQuery {
    pub providers: Option<String>,
    pub asset_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PairsResponse {
    pub pairs: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairPriceResponse {
    pub provider: &'static str,
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub rate: Option<Decimal>,
    pub timestamp: DateTime<Utc>,
    pub raw_data: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub currency_pair: String,
    pub history: Vec<HistoryPoint>,
    pub hours: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRate {
    pub provider: String,
    pub rate: Option<Decimal>,
    pub status: &'static str,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub currency_pair: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub providers: Vec<ProviderRate>,
    pub best_provider: Option<ProviderRate>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinsResponse {
    pub coins: Vec<CoinListing>,
    pub providers: Vec<String>,
    pub asset_type: String,
    pub timestamp: DateTime<Utc>,
    pub total_coins: usize,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn available_pairs() -> Json<Envelope<PairsResponse>> {
    ok(PairsResponse {
        pairs: AVAILABLE_PAIRS.to_vec(),
    })
}

fn price_error(err: &RelayError) -> ApiError {
    let status = match err {
        RelayError::UpstreamStatus { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let details = match err {
        RelayError::UpstreamStatus { body, .. } => Some(body.clone()),
        _ => None,
    };
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: "Failed to fetch Zodia price".into(),
            message: Some(err.to_string()),
            details,
        }),
    )
}

/// Live price for one pair straight from the exchange
pub async fn pair_price(
    State(state): State<AppState>,
    Path(pair): Path<String>,
    Query(query): Query<DirectionQuery>,
) -> ApiResult<PairPriceResponse> {
    let direction = Direction::parse_or_default(query.direction.as_deref()).map_err(|e| relay_error(&e))?;

    tracing::info!(pair = %pair, direction = %direction, "Fetching Zodia price");
    let ticker = state.zodia.price(&pair).await.map_err(|e| {
        tracing::error!(pair = %pair, error = %e, "Zodia price request failed");
        price_error(&e)
    })?;

    Ok(ok(PairPriceResponse {
        provider: "Zodia",
        currency_pair: pair,
        direction,
        rate: ticker.rate(direction),
        timestamp: Utc::now(),
        raw_data: ticker.raw,
    }))
}

pub async fn price_history(
    Path(pair): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Json<Envelope<HistoryResponse>> {
    let hours = query.hours.unwrap_or(24).min(market::MAX_HISTORY_HOURS);

    ok(HistoryResponse {
        currency_pair: pair,
        history: market::price_history(hours),
        hours,
        timestamp: Utc::now(),
    })
}

/// Side-by-side rates from every enabled provider, without touching the cache
pub async fn compare_prices(
    State(state): State<AppState>,
    Path(pair): Path<String>,
    Query(query): Query<DirectionQuery>,
) -> ApiResult<CompareResponse> {
    let direction = Direction::parse_or_default(query.direction.as_deref()).map_err(|e| relay_error(&e))?;
    let collection = state.aggregator.collect(&pair).await;

    let row = |quote: &Quote| ProviderRate {
        provider: quote.provider.clone(),
        rate: quote.rate(direction),
        status: "active",
        last_updated: quote.observed_at,
    };

    Ok(ok(CompareResponse {
        providers: collection.quotes.iter().map(row).collect(),
        best_provider: select_best(&collection.quotes, direction).map(row),
        currency_pair: pair,
        direction,
        timestamp: Utc::now(),
    }))
}

pub async fn list_coins(Query(query): Query<CoinsQuery>) -> Json<Envelope<CoinsResponse>> {
    let providers: Vec<String> = query
        .providers
        .as_deref()
        .unwrap_or("Zodia,TransFi,Ramp")
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
    let asset_type = query.asset_type.unwrap_or_else(|| "all".into());

    let names: Vec<&str> = providers.iter().map(String::as_str).collect();
    let coins = market::coin_board(&names, AssetType::parse_filter(&asset_type));

    ok(CoinsResponse {
        total_coins: coins.len(),
        coins,
        providers,
        asset_type,
        timestamp: Utc::now(),
    })
}
