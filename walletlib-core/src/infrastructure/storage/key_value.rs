//! Key-value wallet repository
//!
//! Stores the wallet as one JSON document under a single key of a
//! [`KeyValueStore`]. Every mutation rewrites the whole document.

use crate::domain::{RepositoryResult, WalletRepository};
use crate::infrastructure::platform::KeyValueStore;
use crate::shared::error::WalletError;
use crate::shared::types::{Amount, Balances};
use crate::shared::utils::{reconcile_currencies, zeroed_balances};
use async_trait::async_trait;
use log::info;
use tokio::sync::Mutex;

pub struct KeyValueWalletRepository<S: KeyValueStore> {
    store: S,
    wallet_key: String,
    // Serializes read-modify-write cycles on the document.
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KeyValueWalletRepository<S> {
    /// Open the wallet stored under `wallet_key`, creating it if missing.
    ///
    /// Listed currencies absent from the stored wallet are added at zero.
    /// With `create_clean` every stored amount is reset to zero first.
    pub fn create<C: AsRef<str>>(
        store: S,
        currencies: &[C],
        wallet_key: impl Into<String>,
        create_clean: bool,
    ) -> Result<Self, WalletError> {
        let repository = Self {
            store,
            wallet_key: wallet_key.into(),
            write_lock: Mutex::new(()),
        };

        if repository.store.exists(&repository.wallet_key)? {
            let mut balances = repository.read()?;
            if reconcile_currencies(&mut balances, currencies, create_clean) {
                repository.write(&balances)?;
            }
        } else {
            info!(
                "Creating wallet {} with {} currencies",
                repository.wallet_key,
                currencies.len()
            );
            repository.write(&zeroed_balances(currencies))?;
        }

        Ok(repository)
    }

    pub fn wallet_key(&self) -> &str {
        &self.wallet_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self) -> RepositoryResult {
        if !self.store.exists(&self.wallet_key)? {
            return Err(WalletError::wallet_not_found(format!(
                "Cannot read wallet {} from store",
                self.wallet_key
            )));
        }
        let data = self.store.retrieve(&self.wallet_key)?;
        Ok(serde_json::from_slice(&data)?)
    }

    fn write(&self, balances: &Balances) -> Result<(), WalletError> {
        let data = serde_json::to_vec(balances)?;
        self.store.store(&self.wallet_key, &data)
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> WalletRepository for KeyValueWalletRepository<S> {
    async fn load(&self) -> RepositoryResult {
        self.read()
    }

    async fn replace_all(&self, balances: Balances) -> RepositoryResult {
        let _guard = self.write_lock.lock().await;
        self.write(&balances)?;
        Ok(balances)
    }

    async fn set_one(&self, currency_id: &str, new_value: Amount) -> RepositoryResult {
        let _guard = self.write_lock.lock().await;
        let mut balances = self.read()?;
        match balances.get_mut(currency_id) {
            Some(value) => *value = new_value,
            None => return Err(WalletError::currency_not_found(currency_id)),
        }
        self.write(&balances)?;
        Ok(balances)
    }
}
