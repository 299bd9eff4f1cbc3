//! Wallet repository contract
//!
//! The persistence boundary of the wallet. Implementations never panic or
//! bubble faults past this trait: every failure is returned as the `Err`
//! side of a [`RepositoryResult`].

use crate::shared::error::WalletError;
use crate::shared::types::{Amount, Balances};
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of one backend operation: the full balance mapping or the cause of failure
pub type RepositoryResult = Result<Balances, WalletError>;

/// Repository handle shared between an engine and its background tasks
pub type SharedRepository = Arc<dyn WalletRepository>;

/// Wallet repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Fetch the full balance mapping
    async fn load(&self) -> RepositoryResult;

    /// Persist a full replacement mapping and return the mapping that is now canonical
    async fn replace_all(&self, balances: Balances) -> RepositoryResult;

    /// Persist one currency's new value and return the full resulting mapping.
    ///
    /// `new_value` is never negative when called by the engine. Backends
    /// without a record for `currency_id` fail with
    /// [`WalletError::CurrencyNotFound`] unless they create keys on write.
    async fn set_one(&self, currency_id: &str, new_value: Amount) -> RepositoryResult;
}
