//! Live Zodia Rate Provider
//!
//! Quotes come from the exchange's public price endpoint.

use std::sync::Arc;

use async_trait::async_trait;

use super::RateProvider;
use crate::error::{RelayError, Result};
use crate::model::{Direction, Quote, QuoteOrigin};
use crate::upstream::ZodiaClient;

pub struct ZodiaRateProvider {
    name: String,
    client: Arc<ZodiaClient>,
}

impl ZodiaRateProvider {
    pub fn new(client: Arc<ZodiaClient>) -> Self {
        Self {
            name: "Zodia".into(),
            client,
        }
    }
}

#[async_trait]
impl RateProvider for ZodiaRateProvider {
    async fn fetch_quote(&self, currency_pair: &str) -> Result<Quote> {
        tracing::info!(provider = %self.name, pair = currency_pair, "Fetching live quote");

        let ticker = self
            .client
            .price(currency_pair)
            .await
            .map_err(|e| RelayError::provider_unavailable(&self.name, e))?;

        if ticker.buy.is_none() && ticker.sell.is_none() {
            return Err(RelayError::provider_unavailable(
                &self.name,
                "price payload carried no usable rate",
            ));
        }

        Ok(Quote::new(
            &self.name,
            currency_pair,
            ticker.rate(Direction::Buy),
            ticker.rate(Direction::Sell),
            QuoteOrigin::Rest,
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
