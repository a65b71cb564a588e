//! Instrument and signed account passthrough handlers
//!
//! Read endpoints fall back to stand-in data when the exchange cannot be
//! reached; the transfer endpoint never does.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use relay_core::upstream::{
    fallback_instruments, mock_account, mock_limits, mock_transactions, mock_transfers, Instrument,
    TransactionQuery, TransferQuery, TransferRequest, FALLBACK_NOTE,
};
use relay_core::{RelayError, Result as RelayResult};
use serde::Serialize;
use serde_json::Value;

use super::{api_error, ok, ok_with_note, ApiResult, Envelope};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InstrumentsResponse {
    pub instruments: Vec<Instrument>,
}

/// Instruments from the exchange, or the fallback listing
pub async fn list_instruments(State(state): State<AppState>) -> Json<Envelope<InstrumentsResponse>> {
    tracing::info!("Fetching available instruments from Zodia");

    let instruments = match state.zodia.instruments().await {
        Ok(instruments) => {
            tracing::info!("Available instruments fetched: {} instruments", instruments.len());
            instruments
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get available instruments");
            fallback_instruments()
        }
    };

    ok(InstrumentsResponse { instruments })
}

fn or_fallback(what: &str, outcome: RelayResult<Value>, fallback: fn() -> Value) -> Json<Envelope<Value>> {
    match outcome {
        Ok(data) => {
            tracing::info!("{what} fetched successfully");
            ok(data)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get {what}");
            ok_with_note(fallback(), FALLBACK_NOTE)
        }
    }
}

pub async fn get_account(State(state): State<AppState>) -> Json<Envelope<Value>> {
    or_fallback("account information", state.zodia.account().await, mock_account)
}

pub async fn get_limits(State(state): State<AppState>) -> Json<Envelope<Value>> {
    or_fallback("trading limits", state.zodia.limits().await, mock_limits)
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Json<Envelope<Value>> {
    or_fallback("transaction history", state.zodia.transactions(&query).await, mock_transactions)
}

pub async fn list_transfers(
    State(state): State<AppState>,
    Query(query): Query<TransferQuery>,
) -> Json<Envelope<Value>> {
    or_fallback("transfer history", state.zodia.transfers(&query).await, mock_transfers)
}

/// Forward a wallet transfer to the exchange
pub async fn execute_transfer(
    State(state): State<AppState>,
    Json(payload): Json<TransferRequest>,
) -> ApiResult<Value> {
    match state.zodia.transfer(&payload).await {
        Ok(result) => {
            tracing::info!("Transfer executed successfully");
            Ok(ok(result))
        }
        Err(RelayError::InvalidRequest(reason)) => Err(api_error(StatusCode::BAD_REQUEST, reason, None)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to execute transfer");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to execute transfer",
                Some(e.to_string()),
            ))
        }
    }
}
