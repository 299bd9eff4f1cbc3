//! Wallet state entity
//!
//! `WalletState` is the value published by the engine on every transition.
//! Exactly one variant is active at a time and a `Valid` state always holds
//! a complete balance snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::repositories::RepositoryResult;
use crate::shared::types::{Amount, Balances};

/// Discriminant of a [`WalletState`], used for logging and quick checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletStateKind {
    Loading,
    Error,
    Valid,
}

impl fmt::Display for WalletStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WalletStateKind::Loading => "loading",
            WalletStateKind::Error => "error",
            WalletStateKind::Valid => "valid",
        };
        f.write_str(name)
    }
}

/// Observable state of a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WalletState {
    /// Waiting for a repository response
    #[default]
    Loading,
    /// The last repository call failed
    Error { message: String },
    /// The repository answered with the full balance mapping
    Valid { balances: Balances },
}

impl WalletState {
    pub fn valid(balances: Balances) -> Self {
        Self::Valid { balances }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> WalletStateKind {
        match self {
            WalletState::Loading => WalletStateKind::Loading,
            WalletState::Error { .. } => WalletStateKind::Error,
            WalletState::Valid { .. } => WalletStateKind::Valid,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WalletState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WalletState::Error { .. })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, WalletState::Valid { .. })
    }

    /// Failure description of an `Error` state
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WalletState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Balance snapshot of a `Valid` state
    pub fn balances(&self) -> Option<&Balances> {
        match self {
            WalletState::Valid { balances } => Some(balances),
            _ => None,
        }
    }

    /// Amount held for `currency_id`; `None` outside `Valid` or for unknown currencies
    pub fn balance(&self, currency_id: &str) -> Option<Amount> {
        self.balances()
            .and_then(|balances| balances.get(currency_id).copied())
    }

    pub fn contains_currency(&self, currency_id: &str) -> bool {
        self.balances()
            .map(|balances| balances.contains_key(currency_id))
            .unwrap_or(false)
    }
}

impl From<RepositoryResult> for WalletState {
    fn from(result: RepositoryResult) -> Self {
        match result {
            Ok(balances) => WalletState::valid(balances),
            Err(err) => WalletState::error(err.to_string()),
        }
    }
}
