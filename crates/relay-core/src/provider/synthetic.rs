//! Synthetic Rate Provider
//!
//! Generates plausible randomized quotes within a configured band, for
//! providers without a live integration.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::RateProvider;
use crate::error::Result;
use crate::model::{Quote, QuoteOrigin};

/// Mid rates and total band width for generated quotes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyntheticBand {
    pub buy_mid: Decimal,
    pub sell_mid: Decimal,
    /// Quotes land within `mid ± width / 2`
    pub width: Decimal,
}

impl Default for SyntheticBand {
    fn default() -> Self {
        Self::new(dec!(85.0), dec!(84.8), dec!(3))
    }
}

impl SyntheticBand {
    pub const fn new(buy_mid: Decimal, sell_mid: Decimal, width: Decimal) -> Self {
        Self { buy_mid, sell_mid, width }
    }

    /// Band used for the primary provider while it has no live feed
    pub fn narrow() -> Self {
        Self::new(dec!(85.0), dec!(84.8), dec!(2))
    }

    fn sample(&self, mid: Decimal) -> Decimal {
        let offset = Decimal::from_f64_retain(unit_random() - 0.5).unwrap_or(Decimal::ZERO);
        (mid + offset * self.width).round_dp(4)
    }
}

/// Provider that fabricates quotes locally
pub struct SyntheticRateProvider {
    name: String,
    band: SyntheticBand,
    /// Simulated response time range in milliseconds
    latency_ms: Option<(u64, u64)>,
}

impl SyntheticRateProvider {
    pub fn new(name: impl Into<String>, band: SyntheticBand) -> Self {
        Self {
            name: name.into(),
            band,
            latency_ms: None,
        }
    }

    /// Simulate an upstream round trip before answering
    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = Some((min_ms.min(max_ms), max_ms.max(min_ms)));
        self
    }

    pub const fn band(&self) -> &SyntheticBand {
        &self.band
    }
}

#[async_trait]
impl RateProvider for SyntheticRateProvider {
    async fn fetch_quote(&self, currency_pair: &str) -> Result<Quote> {
        tracing::debug!(provider = %self.name, pair = currency_pair, "Generating synthetic quote");

        if let Some((min, max)) = self.latency_ms {
            let delay = rand::thread_rng().gen_range(min..=max);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let quote = Quote::new(
            &self.name,
            currency_pair,
            Some(self.band.sample(self.band.buy_mid)),
            Some(self.band.sample(self.band.sell_mid)),
            QuoteOrigin::Synthetic,
        );
        Ok(quote)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Uniform sample in [0, 1)
fn unit_random() -> f64 {
    rand::thread_rng().gen_range(0.0..1.0)
}
