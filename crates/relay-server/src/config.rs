//! Server Configuration
//!
//! Everything is read from the environment after `.env` has been loaded.

use std::sync::Arc;
use std::time::Duration;

use relay_core::provider::{ProviderConfig, SyntheticBand, SyntheticRateProvider, ZodiaRateProvider};
use relay_core::upstream::{ZodiaClient, ZodiaConfig, DEFAULT_TIMEOUT_SECS};

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub bind_addr: String,

    /// Per-provider bound during aggregation
    pub provider_timeout: Duration,

    pub zodia: ZodiaConfig,

    /// Query the live price endpoint for Zodia instead of generating quotes
    pub zodia_live: bool,

    pub zodia_enabled: bool,
    pub transfi_enabled: bool,
    pub ramp_enabled: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:4000".into(),
            provider_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            zodia: ZodiaConfig::default(),
            zodia_live: false,
            zodia_enabled: true,
            transfi_enabled: false,
            ramp_enabled: false,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = std::env::var("PORT").unwrap_or_else(|_| "4000".into());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| format!("0.0.0.0:{port}"));
        let zodia = ZodiaConfig::from_env();

        Self {
            bind_addr,
            provider_timeout: Duration::from_secs(zodia.timeout_secs),
            zodia,
            zodia_live: env_flag("ZODIA_LIVE", defaults.zodia_live),
            zodia_enabled: env_flag("ZODIA_ENABLED", defaults.zodia_enabled),
            transfi_enabled: env_flag("TRANSFI_ENABLED", defaults.transfi_enabled),
            ramp_enabled: env_flag("RAMP_ENABLED", defaults.ramp_enabled),
        }
    }

    /// Adapter list in a fixed order: Zodia, TransFi, Ramp
    pub fn build_providers(&self, client: &Arc<ZodiaClient>) -> Vec<ProviderConfig> {
        let zodia: ProviderConfig = if self.zodia_live && self.zodia.has_api_key() {
            ProviderConfig::new(self.zodia_enabled, Arc::new(ZodiaRateProvider::new(Arc::clone(client))))
        } else {
            if self.zodia_live {
                tracing::warn!("ZODIA_LIVE set but ZODIA_API_KEY missing - using synthetic Zodia quotes");
            }
            ProviderConfig::new(
                self.zodia_enabled,
                Arc::new(SyntheticRateProvider::new("Zodia", SyntheticBand::narrow())),
            )
        };

        let synthetic = |name: &str, enabled: bool| {
            ProviderConfig::new(
                enabled,
                Arc::new(SyntheticRateProvider::new(name, SyntheticBand::default()).with_latency(100, 300)),
            )
        };

        vec![
            zodia,
            synthetic("TransFi", self.transfi_enabled),
            synthetic("Ramp", self.ramp_enabled),
        ]
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_default_provider_layout() {
        let config = RelayConfig::default();
        let client = Arc::new(ZodiaClient::new(config.zodia.clone()).unwrap());
        let providers = config.build_providers(&client);

        let names: Vec<_> = providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Zodia", "TransFi", "Ramp"]);
        let enabled: Vec<_> = providers.iter().map(|p| p.enabled).collect();
        assert_eq!(enabled, [true, false, false]);
    }

    #[test]
    fn test_live_zodia_requires_key() {
        let config = RelayConfig {
            zodia_live: true,
            ..RelayConfig::default()
        };
        let client = Arc::new(ZodiaClient::new(config.zodia.clone()).unwrap());
        // Falls back to the synthetic adapter, still named Zodia
        assert_eq!(config.build_providers(&client)[0].name, "Zodia");
    }
}
