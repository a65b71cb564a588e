//! Rate Cache
//!
//! Single-slot holder of the latest aggregation cycle. The slot stores an
//! `Arc<RateSnapshot>` that is swapped wholesale, so a reader holds either
//! the previous cycle or the new one and never a mix.

use std::sync::{Arc, PoisonError, RwLock};

use crate::model::{AggregationResult, Direction, Quote};
use crate::selector::select_best;

/// Everything one aggregation cycle produced
#[derive(Clone, Debug)]
pub struct RateSnapshot {
    pub result: AggregationResult,
    best_buy: Option<Quote>,
    best_sell: Option<Quote>,
}

impl RateSnapshot {
    /// Derive per-direction bests from the result's quotes
    pub fn from_result(result: AggregationResult) -> Self {
        let best_buy = select_best(&result.quotes, Direction::Buy).cloned();
        let best_sell = select_best(&result.quotes, Direction::Sell).cloned();
        Self {
            result,
            best_buy,
            best_sell,
        }
    }

    pub const fn best(&self, direction: Direction) -> Option<&Quote> {
        match direction {
            Direction::Buy => self.best_buy.as_ref(),
            Direction::Sell => self.best_sell.as_ref(),
        }
    }
}

/// Latest aggregation result, shared across requests
#[derive(Debug, Default)]
pub struct RateCache {
    current: RwLock<Option<Arc<RateSnapshot>>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot; `None` before the first aggregation
    pub fn get(&self) -> Option<Arc<RateSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Best quote for a direction from the latest snapshot
    pub fn best(&self, direction: Direction) -> Option<Quote> {
        self.get().and_then(|snapshot| snapshot.best(direction).cloned())
    }

    /// Replace the slot; only the aggregator writes
    pub(crate) fn set(&self, snapshot: RateSnapshot) {
        let snapshot = Arc::new(snapshot);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }
}
