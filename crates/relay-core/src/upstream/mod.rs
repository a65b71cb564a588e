//! Upstream Exchange Client
//!
//! REST client for the Zodia Markets API: public price and instrument
//! lookups plus the signed account endpoints.

mod account;
mod signing;

pub use account::{
    mock_account, mock_limits, mock_transactions, mock_transfers, TransactionQuery,
    TransferQuery, TransferRequest, FALLBACK_NOTE,
};
pub use signing::{generate_tonce, sign_tonce};

use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RelayError, Result};
use crate::model::Direction;

pub const DEFAULT_BASE_URL: &str = "https://trade-uk.sandbox.zodiamarkets.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upstream client configuration
#[derive(Clone, Debug)]
pub struct ZodiaConfig {
    pub base_url: String,

    pub api_key: Option<String>,

    pub secret_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ZodiaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            secret_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ZodiaConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("ZODIA_BASE_URL")
            .or_else(|_| std::env::var("ZODIA_REST_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let timeout_secs = std::env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            api_key: non_empty_env("ZODIA_API_KEY"),
            secret_key: non_empty_env("ZODIA_SECRET_KEY"),
            timeout_secs,
        }
    }

    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Price ticker returned by `/v1/prices/{pair}`
#[derive(Clone, Debug, Serialize)]
pub struct PriceTicker {
    pub buy: Option<Decimal>,
    pub sell: Option<Decimal>,
    /// Untouched upstream payload
    pub raw: Value,
}

impl PriceTicker {
    /// Build from the upstream JSON; non-object payloads are malformed
    pub fn from_raw(raw: Value) -> Result<Self> {
        let Some(fields) = raw.as_object() else {
            return Err(RelayError::Upstream(format!("malformed price payload: {raw}")));
        };
        Ok(Self {
            buy: parse_rate(fields.get("buy")),
            sell: parse_rate(fields.get("sell")),
            raw,
        })
    }

    pub const fn rate(&self, direction: Direction) -> Option<Decimal> {
        match direction {
            Direction::Buy => self.buy,
            Direction::Sell => self.sell,
        }
    }
}

/// Accepts JSON numbers and numeric strings; anything else is no rate
fn parse_rate(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain)),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// A tradeable instrument listed by the exchange
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub instrument: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub enabled: bool,
}

impl Instrument {
    fn listed(name: &str) -> Self {
        Self {
            instrument: name.into(),
            active: true,
            enabled: true,
        }
    }
}

/// Served when the instrument listing cannot be fetched
pub fn fallback_instruments() -> Vec<Instrument> {
    ["USDT.INR", "USDT.USD", "USDT.EUR", "USDT.GBP", "USDT.CAD", "USDT.AUD"]
        .into_iter()
        .map(Instrument::listed)
        .collect()
}

#[derive(Deserialize)]
struct InstrumentListing {
    #[serde(default)]
    instruments: Vec<Instrument>,
}

/// Zodia Markets REST client
pub struct ZodiaClient {
    http: Client,
    config: ZodiaConfig,
}

impl ZodiaClient {
    pub fn new(config: ZodiaConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ZodiaConfig::from_env())
    }

    pub const fn config(&self) -> &ZodiaConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Current buy/sell price for a pair
    pub async fn price(&self, pair: &str) -> Result<PriceTicker> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| RelayError::Config("Zodia API key not configured".into()))?;

        let response = self
            .http
            .get(self.url(&format!("/v1/prices/{pair}")))
            .header("x-api-key", api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let raw: Value = Self::read_json(response).await?;
        tracing::debug!(pair, payload = %raw, "Zodia price response");
        PriceTicker::from_raw(raw)
    }

    /// Instruments available for trading
    pub async fn instruments(&self) -> Result<Vec<Instrument>> {
        let response = self
            .http
            .get(self.url("/zm/rest/available-instruments"))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let listing: InstrumentListing = Self::read_json(response).await?;
        Ok(listing.instruments)
    }

    /// POST to a signed endpoint; the tonce is added to `body`
    pub async fn signed_post(&self, endpoint: &str, mut body: Map<String, Value>) -> Result<Value> {
        let (api_key, secret) = match (&self.config.api_key, &self.config.secret_key) {
            (Some(key), Some(secret)) => (key.as_str(), secret.as_str()),
            _ => return Err(RelayError::Config("Zodia API credentials not configured".into())),
        };

        let tonce = generate_tonce();
        let signature = sign_tonce(tonce, secret)?;
        body.insert("tonce".into(), Value::from(tonce));

        tracing::info!(endpoint, "Making signed Zodia request");
        let response = self
            .http
            .post(self.url(endpoint))
            .header("Rest-Key", api_key)
            .header("Rest-Sign", signature)
            .json(&body)
            .send()
            .await?;

        tracing::info!(endpoint, status = response.status().as_u16(), "Zodia responded");
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>, secret: Option<&str>) -> ZodiaClient {
        ZodiaClient::new(ZodiaConfig {
            base_url: server.uri(),
            api_key: key.map(Into::into),
            secret_key: secret.map(Into::into),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_rate_variants() {
        assert_eq!(parse_rate(Some(&json!(85.2))), Some(dec!(85.2)));
        assert_eq!(parse_rate(Some(&json!("84.75"))), Some(dec!(84.75)));
        assert_eq!(parse_rate(Some(&json!("NaN"))), None);
        assert_eq!(parse_rate(Some(&json!(null))), None);
        assert_eq!(parse_rate(None), None);
    }

    #[test]
    fn test_ticker_rejects_non_object() {
        assert!(PriceTicker::from_raw(json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn test_price_sends_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/prices/USDT-INR"))
            .and(header("x-api-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"buy": 85.1, "sell": "84.9"})))
            .mount(&server)
            .await;

        let ticker = client_for(&server, Some("key"), None).price("USDT-INR").await.unwrap();
        assert_eq!(ticker.rate(Direction::Buy), Some(dec!(85.1)));
        assert_eq!(ticker.rate(Direction::Sell), Some(dec!(84.9)));
    }

    #[tokio::test]
    async fn test_price_without_key_is_config_error() {
        let server = MockServer::start().await;
        let result = client_for(&server, None, None).price("USDT-INR").await;
        assert!(matches!(result, Err(RelayError::Config(_))));
    }

    #[tokio::test]
    async fn test_non_success_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/prices/USDT-INR"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let result = client_for(&server, Some("key"), None).price("USDT-INR").await;
        assert!(matches!(result, Err(RelayError::UpstreamStatus { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_instruments_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zm/rest/available-instruments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "instruments": [{"instrument": "USDT.INR", "active": true, "enabled": false}]
            })))
            .mount(&server)
            .await;

        let instruments = client_for(&server, None, None).instruments().await.unwrap();
        assert_eq!(instruments.len(), 1);
        assert_eq!(instruments[0].instrument, "USDT.INR");
        assert!(!instruments[0].enabled);
    }

    #[tokio::test]
    async fn test_signed_post_adds_tonce_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/3/account"))
            .and(header("Rest-Key", "key"))
            .and(header_exists("Rest-Sign"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"account": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("key"), Some("secret"));
        let value = client.signed_post("/api/3/account", Map::new()).await.unwrap();
        assert!(value.get("account").is_some());

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body["tonce"].is_i64());
    }

    #[test]
    fn test_fallback_instruments() {
        let instruments = fallback_instruments();
        assert_eq!(instruments.len(), 6);
        assert!(instruments.iter().all(|i| i.active && i.enabled));
    }
}
