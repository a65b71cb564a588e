//! Rate Aggregator
//!
//! Fans out to every enabled provider at once and waits for all of them.
//! A failing or slow provider only loses its own quote: failures are logged
//! and dropped, each call carries its own timeout, and the batch is never
//! cancelled early.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::time::timeout;

use crate::cache::{RateCache, RateSnapshot};
use crate::error::RelayError;
use crate::model::{AggregationResult, Direction, Quote};
use crate::provider::ProviderConfig;
use crate::selector::select_best;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// A provider that did not contribute a quote
#[derive(Clone, Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub reason: String,
}

/// Raw outcome of one fan-out
#[derive(Clone, Debug, Default)]
pub struct Collection {
    pub quotes: Vec<Quote>,
    pub failures: Vec<ProviderFailure>,
    pub providers_queried: usize,
}

pub struct Aggregator {
    providers: Vec<ProviderConfig>,
    cache: Arc<RateCache>,
    provider_timeout: Duration,
}

impl Aggregator {
    pub fn new(providers: Vec<ProviderConfig>, cache: Arc<RateCache>) -> Self {
        Self {
            providers,
            cache,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Bound on each individual provider call
    pub const fn with_timeout(mut self, provider_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self
    }

    pub fn providers(&self) -> &[ProviderConfig] {
        &self.providers
    }

    pub const fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    /// Query every enabled provider concurrently without touching the cache
    pub async fn collect(&self, currency_pair: &str) -> Collection {
        let limit = self.provider_timeout;
        let enabled: Vec<&ProviderConfig> = self.providers.iter().filter(|p| p.enabled).collect();
        let providers_queried = enabled.len();

        tracing::info!(pair = currency_pair, providers = providers_queried, "Fetching all rates");

        let calls = enabled.into_iter().map(|config| {
            let adapter = Arc::clone(&config.adapter);
            let name = config.name.clone();
            async move {
                let outcome = match timeout(limit, adapter.fetch_quote(currency_pair)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(RelayError::provider_unavailable(
                        &name,
                        format!("timed out after {}ms", limit.as_millis()),
                    )),
                };
                (name, outcome)
            }
        });

        let mut collection = Collection {
            providers_queried,
            ..Default::default()
        };

        for (provider, outcome) in join_all(calls).await {
            match outcome {
                Ok(quote) => collection.quotes.push(quote),
                Err(e) => {
                    tracing::warn!(provider = %provider, error = %e, "Provider failed, skipping");
                    collection.failures.push(ProviderFailure {
                        provider,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            pair = currency_pair,
            "Fetched {} valid rates out of {} providers",
            collection.quotes.len(),
            providers_queried
        );
        collection
    }

    /// Run one aggregation cycle and publish it to the cache
    pub async fn aggregate(&self, currency_pair: &str, direction: Direction) -> AggregationResult {
        let collection = self.collect(currency_pair).await;
        let best_quote = select_best(&collection.quotes, direction).cloned();

        match &best_quote {
            Some(best) => tracing::info!(
                direction = %direction,
                provider = %best.provider,
                rate = ?best.rate(direction),
                "Best provider selected"
            ),
            None if collection.quotes.is_empty() => {
                tracing::warn!(pair = currency_pair, "{}", RelayError::NoQuotesAvailable);
            }
            None => tracing::warn!(direction = %direction, "No quote carries a usable rate"),
        }

        let result = AggregationResult {
            quotes: collection.quotes,
            best_quote,
            requested_pair: currency_pair.to_string(),
            requested_direction: direction,
            providers_queried: collection.providers_queried,
            aggregated_at: Utc::now(),
        };

        self.cache.set(RateSnapshot::from_result(result.clone()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::QuoteOrigin;
    use crate::provider::RateProvider;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::time::Instant;

    enum Behaviour {
        Answer(Decimal, Decimal),
        Fail,
        Stall(Duration),
    }

    struct FakeProvider {
        name: String,
        behaviour: Behaviour,
    }

    #[async_trait]
    impl RateProvider for FakeProvider {
        async fn fetch_quote(&self, currency_pair: &str) -> Result<Quote> {
            match self.behaviour {
                Behaviour::Answer(buy, sell) => Ok(Quote::new(
                    &self.name,
                    currency_pair,
                    Some(buy),
                    Some(sell),
                    QuoteOrigin::Rest,
                )),
                Behaviour::Fail => Err(RelayError::provider_unavailable(&self.name, "connection refused")),
                Behaviour::Stall(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(Quote::new(&self.name, currency_pair, Some(dec!(1)), Some(dec!(1)), QuoteOrigin::Rest))
                }
            }
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn provider(name: &str, behaviour: Behaviour) -> ProviderConfig {
        ProviderConfig::new(
            true,
            Arc::new(FakeProvider {
                name: name.into(),
                behaviour,
            }),
        )
    }

    fn aggregator(providers: Vec<ProviderConfig>) -> Aggregator {
        Aggregator::new(providers, Arc::new(RateCache::new()))
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successes() {
        let agg = aggregator(vec![
            provider("A", Behaviour::Answer(dec!(85.2), dec!(85.0))),
            provider("B", Behaviour::Fail),
            provider("C", Behaviour::Answer(dec!(85.5), dec!(85.3))),
        ]);

        let result = agg.aggregate("USDT-INR", Direction::Buy).await;
        assert_eq!(result.providers_queried, 3);
        assert_eq!(result.quotes.len(), 2);
        assert_eq!(result.best_quote.unwrap().provider, "A");
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_result() {
        let agg = aggregator(vec![provider("A", Behaviour::Fail), provider("B", Behaviour::Fail)]);

        let result = agg.aggregate("USDT-INR", Direction::Sell).await;
        assert!(result.is_empty());
        assert!(result.best_quote.is_none());
        assert_eq!(result.requested_direction, Direction::Sell);

        let snapshot = agg.cache().get().unwrap();
        assert!(snapshot.result.quotes.is_empty());
        assert!(snapshot.best(Direction::Sell).is_none());
    }

    #[tokio::test]
    async fn test_no_providers_enabled() {
        let mut disabled = provider("A", Behaviour::Answer(dec!(85), dec!(84)));
        disabled.enabled = false;
        let agg = aggregator(vec![disabled]);

        let collection = agg.collect("USDT-INR").await;
        assert_eq!(collection.providers_queried, 0);
        assert!(collection.quotes.is_empty());
        assert!(collection.failures.is_empty());
    }

    #[tokio::test]
    async fn test_slow_provider_is_cut_off() {
        let agg = aggregator(vec![
            provider("Fast", Behaviour::Answer(dec!(85), dec!(84))),
            provider("Slow", Behaviour::Stall(Duration::from_secs(30))),
        ])
        .with_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let collection = agg.collect("USDT-INR").await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(collection.quotes.len(), 1);
        assert_eq!(collection.failures.len(), 1);
        assert_eq!(collection.failures[0].provider, "Slow");
        assert!(collection.failures[0].reason.contains("timed out"));
    }

    #[tokio::test]
    async fn test_providers_are_queried_concurrently() {
        let agg = aggregator(vec![
            provider("A", Behaviour::Stall(Duration::from_millis(300))),
            provider("B", Behaviour::Stall(Duration::from_millis(300))),
            provider("C", Behaviour::Stall(Duration::from_millis(300))),
        ]);

        let started = Instant::now();
        let collection = agg.collect("USDT-INR").await;

        assert_eq!(collection.quotes.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(850));
    }

    #[tokio::test]
    async fn test_aggregate_publishes_both_directions() {
        let agg = aggregator(vec![
            provider("A", Behaviour::Answer(dec!(85.2), dec!(85.0))),
            provider("B", Behaviour::Answer(dec!(84.8), dec!(84.6))),
            provider("C", Behaviour::Answer(dec!(85.5), dec!(85.3))),
        ]);

        let result = agg.aggregate("USDT-INR", Direction::Buy).await;
        assert_eq!(result.best_quote.unwrap().provider, "B");

        let cache = agg.cache();
        assert_eq!(cache.best(Direction::Buy).unwrap().provider, "B");
        assert_eq!(cache.best(Direction::Sell).unwrap().provider, "C");
        assert_eq!(cache.get().unwrap().result.requested_pair, "USDT-INR");
    }

    #[tokio::test]
    async fn test_collect_leaves_cache_untouched() {
        let agg = aggregator(vec![provider("A", Behaviour::Answer(dec!(85), dec!(84)))]);
        let collection = agg.collect("USDT-INR").await;
        assert_eq!(collection.quotes.len(), 1);
        assert!(agg.cache().get().is_none());
    }
}
