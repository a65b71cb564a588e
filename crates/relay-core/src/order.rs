//! Order Acknowledgement
//!
//! Orders are only accepted against the most recently selected best quote
//! for their side. Accepted orders are acknowledged as pending and never
//! settled here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::RateCache;
use crate::error::{RelayError, Result};
use crate::model::Direction;

fn default_provider() -> String {
    "Zodia".into()
}

fn default_currency() -> String {
    "USDT".into()
}

/// Incoming order
#[derive(Clone, Debug, Deserialize)]
pub struct OrderRequest {
    #[serde(default = "default_provider")]
    pub provider: String,

    pub amount: Option<Decimal>,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Parsed separately so bad values surface as `InvalidDirection`
    pub side: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
}

/// Acknowledgement returned for an accepted order
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub order_id: String,
    pub provider: String,
    pub amount: Decimal,
    pub currency: String,
    pub side: Direction,
    pub rate: Option<Decimal>,
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

/// Validate an order against the cached best quote and acknowledge it
pub fn place_order(cache: &RateCache, request: &OrderRequest) -> Result<OrderAck> {
    let side = Direction::parse_or_default(request.side.as_deref())?;

    let amount = request
        .amount
        .filter(|a| *a > Decimal::ZERO)
        .ok_or_else(|| RelayError::InvalidOrder("amount must be a positive number".into()))?;

    let best = cache
        .best(side)
        .filter(|best| best.provider == request.provider)
        .ok_or_else(|| RelayError::InvalidOrder("Invalid provider or no rates available".into()))?;

    tracing::info!(
        side = %side,
        amount = %amount,
        currency = %request.currency,
        provider = %request.provider,
        "Placing order"
    );

    let ack = OrderAck {
        order_id: format!("ORD_{}", Uuid::new_v4().simple()),
        provider: best.provider.clone(),
        amount,
        currency: request.currency.clone(),
        side,
        rate: best.rate(side),
        status: OrderStatus::Pending,
        timestamp: Utc::now(),
    };

    tracing::info!(order_id = %ack.order_id, "Order placed successfully");
    Ok(ack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RateSnapshot;
    use crate::model::{AggregationResult, Quote, QuoteOrigin};
    use rust_decimal_macros::dec;

    fn primed_cache() -> RateCache {
        let quotes = vec![
            Quote::new("Zodia", "USDT-INR", Some(dec!(85.2)), Some(dec!(85.3)), QuoteOrigin::Synthetic),
            Quote::new("Ramp", "USDT-INR", Some(dec!(84.8)), Some(dec!(84.6)), QuoteOrigin::Synthetic),
        ];
        let cache = RateCache::new();
        cache.set(RateSnapshot::from_result(AggregationResult {
            quotes,
            best_quote: None,
            requested_pair: "USDT-INR".into(),
            requested_direction: Direction::Buy,
            providers_queried: 2,
            aggregated_at: Utc::now(),
        }));
        cache
    }

    fn request(provider: &str, side: Option<&str>) -> OrderRequest {
        OrderRequest {
            provider: provider.into(),
            amount: Some(dec!(100)),
            currency: "USDT".into(),
            side: side.map(Into::into),
        }
    }

    #[test]
    fn test_order_against_best_buy() {
        let ack = place_order(&primed_cache(), &request("Ramp", Some("buy"))).unwrap();
        assert_eq!(ack.provider, "Ramp");
        assert_eq!(ack.rate, Some(dec!(84.8)));
        assert_eq!(ack.status, OrderStatus::Pending);
        assert!(ack.order_id.starts_with("ORD_"));
    }

    #[test]
    fn test_order_side_selects_matching_best() {
        let cache = primed_cache();
        assert!(place_order(&cache, &request("Ramp", Some("sell"))).is_err());
        let ack = place_order(&cache, &request("Zodia", Some("sell"))).unwrap();
        assert_eq!(ack.rate, Some(dec!(85.3)));
    }

    #[test]
    fn test_order_defaults_to_buy() {
        let ack = place_order(&primed_cache(), &request("Ramp", None)).unwrap();
        assert_eq!(ack.side, Direction::Buy);
    }

    #[test]
    fn test_order_rejected_without_rates() {
        let result = place_order(&RateCache::new(), &request("Zodia", Some("buy")));
        assert!(matches!(result, Err(RelayError::InvalidOrder(_))));
    }

    #[test]
    fn test_order_rejects_bad_side_and_amount() {
        let cache = primed_cache();
        assert!(matches!(
            place_order(&cache, &request("Ramp", Some("hold"))),
            Err(RelayError::InvalidDirection(_))
        ));

        let mut zero = request("Ramp", Some("buy"));
        zero.amount = Some(Decimal::ZERO);
        assert!(matches!(place_order(&cache, &zero), Err(RelayError::InvalidOrder(_))));
    }

    #[test]
    fn test_order_request_defaults() {
        let parsed: OrderRequest = serde_json::from_str(r#"{"amount": 25}"#).unwrap();
        assert_eq!(parsed.provider, "Zodia");
        assert_eq!(parsed.currency, "USDT");
        assert_eq!(parsed.amount, Some(dec!(25)));
        assert!(parsed.side.is_none());
    }
}
