//! rate-relay HTTP Server
//!
//! Axum server exposing multi-provider rate aggregation, best-quote lookup,
//! order acknowledgement and a passthrough to the Zodia exchange.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use relay_core::{Aggregator, RateCache, ZodiaClient};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::RelayConfig;
use crate::handlers::{
    available_pairs, compare_prices, execute_transfer, get_account, get_best, get_limits, get_rates,
    health_check, list_coins, list_instruments, list_transactions, list_transfers, pair_price,
    price_history, submit_order,
};
use crate::state::AppState;

/// All API routes over the given state
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/api/health", get(health_check))
        // Aggregation
        .route("/api/rates", get(get_rates))
        .route("/api/best", get(get_best))
        .route("/api/order", post(submit_order))
        // Exchange passthrough
        .route("/api/instruments", get(list_instruments))
        .route("/api/account", get(get_account))
        .route("/api/limits", get(get_limits))
        .route("/api/transactions", get(list_transactions))
        .route("/api/transfers", get(list_transfers))
        .route("/api/transfer", post(execute_transfer))
        // Prices
        .route("/api/price/pairs/available", get(available_pairs))
        .route("/api/price/{pair}", get(pair_price))
        .route("/api/price/{pair}/history", get(price_history))
        .route("/api/price/{pair}/compare", get(compare_prices))
        .route("/api/coins", get(list_coins))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = RelayConfig::from_env();
    let zodia = Arc::new(ZodiaClient::new(config.zodia.clone())?);

    if config.zodia.has_api_key() {
        tracing::info!("✓ Zodia credentials configured ({})", config.zodia.base_url);
    } else {
        tracing::warn!("⚠ Zodia credentials missing - account routes will serve mock data");
        tracing::warn!("  Set ZODIA_API_KEY and ZODIA_SECRET_KEY in .env");
    }

    let providers = config.build_providers(&zodia);
    for provider in &providers {
        let mark = if provider.enabled { "•" } else { "-" };
        tracing::info!("  {} {} (enabled: {})", mark, provider.name, provider.enabled);
    }

    let aggregator = Aggregator::new(providers, Arc::new(RateCache::new())).with_timeout(config.provider_timeout);
    let app = build_router(AppState::new(aggregator, zodia));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 rate-relay server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health                  - Health check");
    tracing::info!("  GET  /api/rates?pair=&type=       - Aggregate rates");
    tracing::info!("  GET  /api/best?type=              - Cached best provider");
    tracing::info!("  POST /api/order                   - Place order");
    tracing::info!("  GET  /api/instruments             - Available instruments");
    tracing::info!("  GET  /api/account                 - Account information");
    tracing::info!("  GET  /api/limits                  - Trading limits");
    tracing::info!("  GET  /api/transactions            - Transaction history");
    tracing::info!("  GET  /api/transfers               - Transfer history");
    tracing::info!("  POST /api/transfer                - Execute transfer");
    tracing::info!("  GET  /api/price/pairs/available   - Supported pairs");
    tracing::info!("  GET  /api/price/{{pair}}            - Live Zodia price");
    tracing::info!("  GET  /api/price/{{pair}}/history    - Price history");
    tracing::info!("  GET  /api/price/{{pair}}/compare    - Compare providers");
    tracing::info!("  GET  /api/coins                   - Coin board");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
