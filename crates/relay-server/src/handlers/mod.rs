//! HTTP Handlers
//!
//! Every success body is `{"success": true, "data": ...}` and every error
//! body is `{"success": false, "error": ...}`.

mod account;
mod price;
mod rates;

pub use account::{execute_transfer, get_account, get_limits, list_instruments, list_transactions, list_transfers};
pub use price::{available_pairs, compare_prices, list_coins, pair_price, price_history};
pub use rates::{get_best, get_rates, health_check, submit_order};

use axum::{http::StatusCode, Json};
use relay_core::RelayError;
use serde::Serialize;

// ============================================================================
// Envelopes
// ============================================================================

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

pub fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
        note: None,
    })
}

/// Success envelope carrying a note, used when serving stand-in data
pub fn ok_with_note<T>(data: T, note: &'static str) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
        note: Some(note),
    })
}

pub fn api_error(status: StatusCode, error: impl Into<String>, message: Option<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: error.into(),
            message,
            details: None,
        }),
    )
}

/// Map a core error onto its HTTP status with the error text as the message
pub fn relay_error(err: &RelayError) -> ApiError {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    api_error(status, err.to_string(), None)
}
