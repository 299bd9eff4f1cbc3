//! Repositories used by the engine and controller tests

use crate::core::broadcast::StateSubscription;
use crate::domain::{RepositoryResult, WalletRepository, WalletState};
use crate::shared::error::WalletError;
use crate::shared::types::{Amount, Balances};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Repository call observed by a [`GatedRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load,
    ReplaceAll(Balances),
    SetOne(String, Amount),
}

pub type Responder = oneshot::Sender<RepositoryResult>;

/// Repository whose every call blocks until the test answers it
pub struct GatedRepository {
    calls: mpsc::UnboundedSender<(Call, Responder)>,
}

impl GatedRepository {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(Call, Responder)>) {
        let (calls, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { calls }), receiver)
    }

    async fn gate(&self, call: Call) -> RepositoryResult {
        let (responder, response) = oneshot::channel();
        if self.calls.send((call, responder)).is_err() {
            return Err(WalletError::unexpected("test gate closed"));
        }
        response
            .await
            .unwrap_or_else(|_| Err(WalletError::unexpected("test responder dropped")))
    }
}

#[async_trait]
impl WalletRepository for GatedRepository {
    async fn load(&self) -> RepositoryResult {
        self.gate(Call::Load).await
    }

    async fn replace_all(&self, balances: Balances) -> RepositoryResult {
        self.gate(Call::ReplaceAll(balances)).await
    }

    async fn set_one(&self, currency_id: &str, new_value: Amount) -> RepositoryResult {
        self.gate(Call::SetOne(currency_id.to_string(), new_value)).await
    }
}

/// Repository that loads fine and panics on every write
pub struct PanickingRepository {
    pub initial: Balances,
}

#[async_trait]
impl WalletRepository for PanickingRepository {
    async fn load(&self) -> RepositoryResult {
        Ok(self.initial.clone())
    }

    async fn replace_all(&self, _balances: Balances) -> RepositoryResult {
        panic!("replace_all exploded");
    }

    async fn set_one(&self, _currency_id: &str, _new_value: Amount) -> RepositoryResult {
        panic!("set_one exploded");
    }
}

pub fn balances(entries: &[(&str, Amount)]) -> Balances {
    entries
        .iter()
        .map(|(currency, value)| (currency.to_string(), *value))
        .collect()
}

/// Initial wallet used across the engine and controller tests
pub fn sample_balances() -> Balances {
    balances(&[("a", 20), ("b", 4000), ("c", 0)])
}

/// Next state on `subscription`, failing the test after one second
pub async fn next_state(subscription: &mut StateSubscription) -> WalletState {
    tokio::time::timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("timed out waiting for a wallet state")
        .expect("state stream closed")
}

/// Next call reaching a [`GatedRepository`], failing the test after one second
pub async fn next_call(
    calls: &mut mpsc::UnboundedReceiver<(Call, Responder)>,
) -> (Call, Responder) {
    tokio::time::timeout(Duration::from_secs(1), calls.recv())
        .await
        .expect("timed out waiting for a repository call")
        .expect("repository dropped")
}
