//! Error handling for the wallet core
//!
//! This module defines the error type carried by every repository result.
//! Errors never cross the engine boundary as faults; they end up as the
//! message of a published `WalletState::Error`.

use thiserror::Error;

/// Wallet error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl WalletError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a wallet not found error
    pub fn wallet_not_found(message: impl Into<String>) -> Self {
        Self::WalletNotFound(message.into())
    }

    /// Create a currency not found error
    pub fn currency_not_found(currency_id: impl Into<String>) -> Self {
        Self::CurrencyNotFound(currency_id.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Whether the backend had no record for the wallet or the currency
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::WalletNotFound(_) | Self::CurrencyNotFound(_))
    }
}

// Standard library error conversions
impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::wallet_not_found(format!("IO error: {}", err)),
            _ => Self::storage(format!("IO error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<bincode::error::EncodeError> for WalletError {
    fn from(err: bincode::error::EncodeError) -> Self {
        Self::serialization(format!("Binary encode error: {}", err))
    }
}

impl From<bincode::error::DecodeError> for WalletError {
    fn from(err: bincode::error::DecodeError) -> Self {
        Self::serialization(format!("Binary decode error: {}", err))
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::serialization(format!("Invalid response body: {}", err))
        } else {
            Self::network(format!("Request failed: {}", err))
        }
    }
}

impl From<config::ConfigError> for WalletError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}
