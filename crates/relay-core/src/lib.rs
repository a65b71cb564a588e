//! # relay-core
//!
//! Multi-provider exchange-rate aggregation with best-quote selection.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   fan-out    ┌─────────────────────────────┐
//! │  Aggregator  │─────────────▶│ RateProvider (Zodia, Ramp…) │
//! │              │◀─────────────│   one quote or a failure    │
//! └──────┬───────┘  join all    └─────────────────────────────┘
//!        │ quotes
//!        ▼
//! ┌──────────────┐  best buy / best sell  ┌─────────────┐
//! │   Selector   │───────────────────────▶│  RateCache  │
//! └──────────────┘   atomic snapshot      └─────────────┘
//! ```
//!
//! A provider that fails or times out only loses its own quote. When every
//! provider fails the cycle still succeeds, with no quotes and no best quote.
//!
//! Buying picks the lowest buy rate; selling picks the highest sell rate.

pub mod aggregator;
pub mod cache;
pub mod error;
pub mod market;
pub mod model;
pub mod order;
pub mod provider;
pub mod selector;
pub mod upstream;

pub use aggregator::{Aggregator, Collection, ProviderFailure};
pub use cache::{RateCache, RateSnapshot};
pub use error::{RelayError, Result};
pub use model::{AggregationResult, Direction, Quote, QuoteOrigin, DEFAULT_PAIR};
pub use order::{place_order, OrderAck, OrderRequest};
pub use provider::{ProviderConfig, RateProvider, SyntheticBand, SyntheticRateProvider, ZodiaRateProvider};
pub use selector::select_best;
pub use upstream::{ZodiaClient, ZodiaConfig};
