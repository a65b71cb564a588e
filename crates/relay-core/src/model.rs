//! Domain Models
//!
//! Core data types for rate aggregation.
//! Uses `rust_decimal` for all rates - never use f64 for money!

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Currency pair used when a caller does not name one
pub const DEFAULT_PAIR: &str = "USDT-INR";

/// Trade direction from the caller's point of view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Caller acquires the target asset; lowest buy rate wins
    #[default]
    Buy,
    /// Caller disposes of the target asset; highest sell rate wins
    Sell,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Whether `candidate` strictly beats `incumbent` for this direction
    pub fn improves(self, candidate: Decimal, incumbent: Decimal) -> bool {
        match self {
            Self::Buy => candidate < incumbent,
            Self::Sell => candidate > incumbent,
        }
    }

    /// Parse an optional query value, defaulting to `Buy` when absent
    pub fn parse_or_default(value: Option<&str>) -> Result<Self, RelayError> {
        value.map_or(Ok(Self::default()), str::parse)
    }
}

impl FromStr for Direction {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(RelayError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a quote came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteOrigin {
    Rest,
    Synthetic,
}

/// One provider's buy/sell rate for a currency pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub provider: String,

    /// Requested pair, echoed unchanged
    pub currency_pair: String,

    pub buy_rate: Option<Decimal>,

    pub sell_rate: Option<Decimal>,

    pub observed_at: DateTime<Utc>,

    pub source: QuoteOrigin,
}

impl Quote {
    pub fn new(
        provider: impl Into<String>,
        currency_pair: impl Into<String>,
        buy_rate: Option<Decimal>,
        sell_rate: Option<Decimal>,
        source: QuoteOrigin,
    ) -> Self {
        Self {
            provider: provider.into(),
            currency_pair: currency_pair.into(),
            buy_rate,
            sell_rate,
            observed_at: Utc::now(),
            source,
        }
    }

    /// Usable rate for a direction; missing or non-positive rates yield `None`
    pub fn rate(&self, direction: Direction) -> Option<Decimal> {
        let rate = match direction {
            Direction::Buy => self.buy_rate,
            Direction::Sell => self.sell_rate,
        };
        rate.filter(|r| *r > Decimal::ZERO)
    }
}

/// Outcome of one aggregation cycle
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Quotes from providers that answered, in response order
    pub quotes: Vec<Quote>,

    pub best_quote: Option<Quote>,

    pub requested_pair: String,

    pub requested_direction: Direction,

    pub providers_queried: usize,

    pub aggregated_at: DateTime<Utc>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
