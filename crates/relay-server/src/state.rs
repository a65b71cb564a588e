//! Application State

use std::sync::Arc;

use relay_core::{Aggregator, RateCache, ZodiaClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Fans out to the configured providers and publishes to the cache
    pub aggregator: Arc<Aggregator>,

    /// Latest aggregation cycle (read-only from handlers)
    pub cache: Arc<RateCache>,

    /// Upstream exchange client for price and account passthrough
    pub zodia: Arc<ZodiaClient>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, zodia: Arc<ZodiaClient>) -> Self {
        let cache = Arc::clone(aggregator.cache());
        Self {
            aggregator: Arc::new(aggregator),
            cache,
            zodia,
        }
    }
}
