//! Quote Source Adapters
//!
//! One adapter per provider family. The aggregator only ever sees the
//! [`RateProvider`] trait; which adapter backs a provider is decided by
//! configuration when the [`ProviderConfig`] list is built.

mod synthetic;
mod zodia;

pub use synthetic::{SyntheticBand, SyntheticRateProvider};
pub use zodia::ZodiaRateProvider;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Quote;

/// Fetches one quote from one provider (Strategy pattern)
///
/// Failures are reported as `RelayError::ProviderUnavailable`.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Current quote for a currency pair such as "USDT-INR"
    async fn fetch_quote(&self, currency_pair: &str) -> Result<Quote>;

    /// Provider name as it appears on quotes
    fn name(&self) -> &str;
}

/// Static descriptor of one upstream source
#[derive(Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub enabled: bool,
    pub adapter: Arc<dyn RateProvider>,
}

impl ProviderConfig {
    pub fn new(enabled: bool, adapter: Arc<dyn RateProvider>) -> Self {
        Self {
            name: adapter.name().to_string(),
            enabled,
            adapter,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
