//! Error Types for the Rate Relay

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Provider {provider} unavailable: {reason}")]
    ProviderUnavailable {
        provider: String,
        reason: String,
    },

    #[error("No quotes available")]
    NoQuotesAvailable,

    #[error("Invalid trade direction: {0}")]
    InvalidDirection(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus {
        status: u16,
        body: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RelayError {
    pub fn provider_unavailable(provider: impl Into<String>, reason: impl ToString) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status the request shell should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidDirection(_) | Self::InvalidOrder(_) | Self::InvalidRequest(_) => 400,
            Self::NoQuotesAvailable => 404,
            Self::ProviderUnavailable { .. } | Self::Network(_) => 502,
            Self::UpstreamStatus { status, .. } => *status,
            Self::Upstream(_) | Self::Config(_) | Self::Serialization(_) => 500,
        }
    }
}
