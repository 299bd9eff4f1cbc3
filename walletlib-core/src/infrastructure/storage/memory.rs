//! In-memory wallet repository

use crate::domain::{RepositoryResult, WalletRepository};
use crate::shared::error::WalletError;
use crate::shared::types::{Amount, Balances};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Repository keeping the wallet in process memory.
///
/// Rejects updates to currencies it has no record of.
#[derive(Default)]
pub struct InMemoryWalletRepository {
    balances: Mutex<Balances>,
}

impl InMemoryWalletRepository {
    pub fn new(balances: Balances) -> Self {
        Self {
            balances: Mutex::new(balances),
        }
    }

    /// Copy of the stored wallet, bypassing the engine
    pub fn snapshot(&self) -> Balances {
        self.balances().clone()
    }

    fn balances(&self) -> MutexGuard<'_, Balances> {
        self.balances.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn load(&self) -> RepositoryResult {
        Ok(self.snapshot())
    }

    async fn replace_all(&self, balances: Balances) -> RepositoryResult {
        *self.balances() = balances.clone();
        Ok(balances)
    }

    async fn set_one(&self, currency_id: &str, new_value: Amount) -> RepositoryResult {
        let mut balances = self.balances();
        match balances.get_mut(currency_id) {
            Some(value) => {
                *value = new_value;
                Ok(balances.clone())
            }
            None => Err(WalletError::currency_not_found(currency_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{balances, sample_balances};

    #[tokio::test]
    async fn test_set_one_returns_full_mapping() {
        let repository = InMemoryWalletRepository::new(sample_balances());
        let result = repository.set_one("b", 1).await.unwrap();

        assert_eq!(result, balances(&[("a", 20), ("b", 1), ("c", 0)]));
        assert_eq!(repository.snapshot(), result);
    }

    #[tokio::test]
    async fn test_set_one_unknown_currency_fails() {
        let repository = InMemoryWalletRepository::new(sample_balances());
        let err = repository.set_one("zzz", 1).await.unwrap_err();

        assert_eq!(err, WalletError::currency_not_found("zzz"));
        assert_eq!(repository.snapshot(), sample_balances());
    }

    #[tokio::test]
    async fn test_replace_all_echoes_mapping() {
        let repository = InMemoryWalletRepository::default();
        assert!(repository.load().await.unwrap().is_empty());

        let replacement = balances(&[("x", 5)]);
        assert_eq!(repository.replace_all(replacement.clone()).await.unwrap(), replacement);
        assert_eq!(repository.load().await.unwrap(), replacement);
    }
}
