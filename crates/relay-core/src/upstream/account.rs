//! Signed account endpoints and their offline stand-ins

use chrono::{Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::ZodiaClient;
use crate::error::{RelayError, Result};

/// Attached to responses served from the stand-in data
pub const FALLBACK_NOTE: &str = "Using mock data due to API error";

const fn default_max() -> u32 {
    50
}

/// Filters for the transaction history listing
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub ccy: Option<String>,
    pub transaction_state: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    #[serde(default = "default_max")]
    pub max: u32,
    #[serde(default)]
    pub offset: u32,
    pub transaction_class: Option<String>,
    pub transaction_type: Option<String>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            ccy: None,
            transaction_state: None,
            from: None,
            to: None,
            max: default_max(),
            offset: 0,
            transaction_class: None,
            transaction_type: None,
        }
    }
}

impl TransactionQuery {
    fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("max".into(), self.max.into());
        body.insert("offset".into(), self.offset.into());
        insert_opt(&mut body, "ccy", self.ccy.clone());
        insert_opt(&mut body, "transactionState", self.transaction_state.clone());
        insert_opt(&mut body, "from", self.from);
        insert_opt(&mut body, "to", self.to);
        insert_opt(&mut body, "transactionClass", self.transaction_class.clone());
        insert_opt(&mut body, "transactionType", self.transaction_type.clone());
        body
    }
}

/// Filters for the transfer history listing
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TransferQuery {
    pub ccy: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl TransferQuery {
    fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        insert_opt(&mut body, "ccy", self.ccy.clone());
        insert_opt(&mut body, "from", self.from);
        insert_opt(&mut body, "to", self.to);
        body
    }
}

/// Move funds between account wallets
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<Decimal>,
    pub ccy: Option<String>,
    pub account_group_uuid: Option<String>,
}

impl TransferRequest {
    /// Every field is required and the amount must be positive
    pub fn to_body(&self) -> Result<Map<String, Value>> {
        let missing = || {
            RelayError::InvalidRequest(
                "Missing required parameters: from, to, amount, ccy, accountGroupUuid".into(),
            )
        };
        let text = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        let from = text(&self.from).ok_or_else(missing)?;
        let to = text(&self.to).ok_or_else(missing)?;
        let ccy = text(&self.ccy).ok_or_else(missing)?;
        let group = text(&self.account_group_uuid).ok_or_else(missing)?;
        let amount = self.amount.filter(|a| *a > Decimal::ZERO).ok_or_else(missing)?;

        let mut body = Map::new();
        body.insert("from".into(), from.into());
        body.insert("to".into(), to.into());
        body.insert("amount".into(), json!(amount.to_f64()));
        body.insert("ccy".into(), ccy.into());
        body.insert("accountGroupUuid".into(), group.into());
        Ok(body)
    }
}

fn insert_opt<T: Into<Value>>(body: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        body.insert(key.into(), v.into());
    }
}

impl ZodiaClient {
    pub async fn account(&self) -> Result<Value> {
        self.signed_post("/api/3/account", Map::new()).await
    }

    pub async fn limits(&self) -> Result<Value> {
        self.signed_post("/api/3/user/limit", Map::new()).await
    }

    pub async fn transactions(&self, query: &TransactionQuery) -> Result<Value> {
        self.signed_post("/api/3/transaction/list", query.to_body()).await
    }

    pub async fn transfers(&self, query: &TransferQuery) -> Result<Value> {
        self.signed_post("/api/3/transfer/list", query.to_body()).await
    }

    pub async fn transfer(&self, request: &TransferRequest) -> Result<Value> {
        let body = request.to_body()?;
        self.signed_post("/api/3/transfer", body).await
    }
}

pub fn mock_account() -> Value {
    json!({
        "account": {
            "primary": { "available": 10000.00, "balance": 10000.00, "currency": "USD" },
            "brokerage": { "available": 5000.00, "balance": 5000.00, "currency": "USD" },
            "tradeAheadBalance": 1000.00,
            "availableBalance": 15000.00,
            "balance": 15000.00
        }
    })
}

pub fn mock_limits() -> Value {
    json!({
        "limits": {
            "daily": 100000.00,
            "monthly": 1000000.00,
            "currency": "USD",
            "remaining": { "daily": 75000.00, "monthly": 850000.00 }
        }
    })
}

pub fn mock_transactions() -> Value {
    let now = Utc::now();
    json!({
        "transactions": [
            {
                "id": "TXN_001",
                "transactionClass": "RFSTRADE",
                "transactionState": "PROCESSED",
                "transactionType": "TRADE_CREDIT",
                "amount": 1000.00,
                "currency": "USD",
                "timestamp": now.to_rfc3339(),
                "description": "BTC purchase"
            },
            {
                "id": "TXN_002",
                "transactionClass": "COIN",
                "transactionState": "PROCESSED",
                "transactionType": "DEPOSIT",
                "amount": 0.05,
                "currency": "BTC",
                "timestamp": (now - Duration::days(1)).to_rfc3339(),
                "description": "BTC deposit"
            }
        ]
    })
}

pub fn mock_transfers() -> Value {
    let now = Utc::now();
    json!({
        "transfers": [
            {
                "id": "TRF_001",
                "fromType": "AVAILABLE",
                "toType": "BROKERAGE",
                "amount": 5000.00,
                "currency": "USD",
                "timestamp": now.to_rfc3339(),
                "status": "COMPLETED"
            },
            {
                "id": "TRF_002",
                "fromType": "BROKERAGE",
                "toType": "AVAILABLE",
                "amount": 1000.00,
                "currency": "USD",
                "timestamp": (now - Duration::days(1)).to_rfc3339(),
                "status": "COMPLETED"
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_query_body_skips_unset_filters() {
        let query = TransactionQuery {
            ccy: Some("USD".into()),
            ..Default::default()
        };
        let body = query.to_body();
        assert_eq!(body["max"], 50);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["ccy"], "USD");
        assert!(!body.contains_key("transactionState"));
        assert!(!body.contains_key("from"));
    }

    #[test]
    fn test_transfer_request_requires_every_field() {
        let partial = TransferRequest {
            from: Some("AVAILABLE".into()),
            to: Some("BROKERAGE".into()),
            amount: Some(dec!(10)),
            ccy: Some("USD".into()),
            account_group_uuid: None,
        };
        assert!(matches!(partial.to_body(), Err(RelayError::InvalidRequest(_))));

        let complete = TransferRequest {
            account_group_uuid: Some("group-1".into()),
            ..partial
        };
        let body = complete.to_body().unwrap();
        assert_eq!(body["accountGroupUuid"], "group-1");
        assert_eq!(body["from"], "AVAILABLE");
    }

    #[test]
    fn test_transfer_request_rejects_zero_amount() {
        let request = TransferRequest {
            from: Some("A".into()),
            to: Some("B".into()),
            amount: Some(Decimal::ZERO),
            ccy: Some("USD".into()),
            account_group_uuid: Some("g".into()),
        };
        assert!(request.to_body().is_err());
    }

    #[test]
    fn test_mock_payloads_have_expected_shape() {
        assert!(mock_account()["account"]["balance"].is_number());
        assert!(mock_limits()["limits"]["remaining"]["daily"].is_number());
        assert_eq!(mock_transactions()["transactions"].as_array().unwrap().len(), 2);
        assert_eq!(mock_transfers()["transfers"][0]["status"], "COMPLETED");
    }
}
