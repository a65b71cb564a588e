//! Market Board
//!
//! Static pair listing plus synthetic history and per-provider coin
//! listings used by the dashboard endpoints.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Pairs offered for quoting
pub const AVAILABLE_PAIRS: [&str; 6] = [
    "USDT-INR", "USDC-INR", "BTC-INR", "ETH-INR", "USDT-USD", "USDC-USD",
];

/// Longest history window served, in hours
pub const MAX_HISTORY_HOURS: u32 = 720;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub buy_rate: Decimal,
    pub sell_rate: Decimal,
    pub provider: String,
}

/// Hourly points from `hours` ago up to now, oldest first
pub fn price_history(hours: u32) -> Vec<HistoryPoint> {
    let hours = hours.min(MAX_HISTORY_HOURS);
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    (0..=hours)
        .rev()
        .map(|i| {
            let offset = Decimal::from_f64_retain(rng.gen_range(-1.0..1.0)).unwrap_or(Decimal::ZERO);
            let base = (dec!(85.0) + offset).round_dp(4);
            HistoryPoint {
                timestamp: now - Duration::hours(i64::from(i)),
                buy_rate: base + dec!(0.1),
                sell_rate: base - dec!(0.1),
                provider: "Zodia".into(),
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Stablecoin,
    Crypto,
}

impl AssetType {
    /// `None` means no filter ("all" or anything unrecognised)
    pub fn parse_filter(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "stablecoin" => Some(Self::Stablecoin),
            "crypto" => Some(Self::Crypto),
            _ => None,
        }
    }
}

struct Coin {
    symbol: &'static str,
    name: &'static str,
    asset_type: AssetType,
    base_price: Decimal,
}

const fn coin(symbol: &'static str, name: &'static str, asset_type: AssetType, base_price: Decimal) -> Coin {
    Coin { symbol, name, asset_type, base_price }
}

fn coins() -> [Coin; 10] {
    use AssetType::{Crypto, Stablecoin};
    [
        coin("USDT", "Tether", Stablecoin, dec!(1.00)),
        coin("USDC", "USD Coin", Stablecoin, dec!(1.00)),
        coin("USDE", "USD Digital", Stablecoin, dec!(0.99)),
        coin("FDUSD", "First Digital USD", Stablecoin, dec!(1.00)),
        coin("USDS", "USD Stablecoin", Stablecoin, dec!(1.00)),
        coin("DAI", "Multi-Collateral Dai", Stablecoin, dec!(1.00)),
        coin("BTC", "Bitcoin", Crypto, dec!(45000)),
        coin("ETH", "Ethereum", Crypto, dec!(2800)),
        coin("BNB", "Binance Coin", Crypto, dec!(320)),
        coin("SOL", "Solana", Crypto, dec!(95)),
    ]
}

/// Display metadata for providers the board knows about
fn provider_color(provider: &str) -> Option<&'static str> {
    match provider {
        "Zodia" => Some("bg-blue-500"),
        "TransFi" => Some("bg-green-500"),
        "Ramp" => Some("bg-purple-500"),
        _ => None,
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinListing {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub price: String,
    pub exchange_rate: String,
    pub change_rate: String,
    pub provider: String,
    pub provider_name: String,
    pub provider_color: String,
    pub last_updated: DateTime<Utc>,
}

fn jitter(rng: &mut impl Rng, low: f64, high: f64) -> Decimal {
    Decimal::from_f64_retain(rng.gen_range(low..high)).unwrap_or(Decimal::ONE)
}

/// One listing per coin and known provider; unknown providers are skipped
pub fn coin_board(providers: &[&str], filter: Option<AssetType>) -> Vec<CoinListing> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut listings = Vec::new();

    for coin in coins().iter().filter(|c| filter.is_none_or(|f| c.asset_type == f)) {
        for &provider in providers {
            let Some(color) = provider_color(provider) else {
                continue;
            };

            let price = coin.base_price * jitter(&mut rng, 0.99, 1.01);
            let exchange_rate = match coin.asset_type {
                AssetType::Stablecoin => jitter(&mut rng, 0.99, 1.01),
                AssetType::Crypto => price * jitter(&mut rng, 0.95, 1.05),
            };
            let change_rate = jitter(&mut rng, -1.0, 1.0);

            listings.push(CoinListing {
                id: format!("{}-{}", coin.symbol, provider),
                symbol: coin.symbol.into(),
                name: coin.name.into(),
                asset_type: coin.asset_type,
                price: format!("{:.6}", price.round_dp(6)),
                exchange_rate: format!("{:.4}", exchange_rate.round_dp(4)),
                change_rate: format!("{:.2}", change_rate.round_dp(2)),
                provider: provider.into(),
                provider_name: provider.into(),
                provider_color: color.into(),
                last_updated: now,
            });
        }
    }

    listings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_has_hours_plus_one_points() {
        let history = price_history(24);
        assert_eq!(history.len(), 25);
        assert!(history.first().unwrap().timestamp < history.last().unwrap().timestamp);
        for point in &history {
            assert_eq!(point.buy_rate - point.sell_rate, dec!(0.2));
        }
    }

    #[test]
    fn test_history_is_capped() {
        assert_eq!(price_history(100_000).len(), MAX_HISTORY_HOURS as usize + 1);
    }

    #[test]
    fn test_coin_board_filters_by_type() {
        let stable = coin_board(&["Zodia"], Some(AssetType::Stablecoin));
        assert_eq!(stable.len(), 6);
        assert!(stable.iter().all(|c| c.asset_type == AssetType::Stablecoin));

        let all = coin_board(&["Zodia", "Ramp"], None);
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_coin_board_skips_unknown_providers() {
        let listings = coin_board(&["Nobody", "TransFi"], Some(AssetType::Crypto));
        assert_eq!(listings.len(), 4);
        assert!(listings.iter().all(|c| c.provider == "TransFi"));
        assert_eq!(listings[0].provider_color, "bg-green-500");
    }

    #[test]
    fn test_coin_prices_formatted() {
        let listings = coin_board(&["Zodia"], Some(AssetType::Stablecoin));
        let price = &listings[0].price;
        assert_eq!(price.split('.').nth(1).unwrap().len(), 6);
        assert_eq!(listings[0].exchange_rate.split('.').nth(1).unwrap().len(), 4);
    }

    #[test]
    fn test_asset_type_filter_parsing() {
        assert_eq!(AssetType::parse_filter("crypto"), Some(AssetType::Crypto));
        assert_eq!(AssetType::parse_filter("all"), None);
    }
}
