//! Wallet engine
//!
//! The engine owns the wallet's state cell and keeps it in sync with one
//! repository. Every repository call is preceded by a published `Loading`
//! state and followed by exactly one published outcome: `Valid` with the
//! mapping the repository returned, or `Error` with the failure.
//!
//! Mutations are not queued. A mutation issued while another is in flight
//! races it, and whichever repository call resolves last decides the final
//! state.

use crate::core::broadcast::{StateBroadcaster, StateSubscription};
use crate::domain::{RepositoryResult, SharedRepository, WalletState};
use crate::shared::error::WalletError;
use crate::shared::types::{Amount, Balances};
use crate::shared::utils::first_negative;
use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, error, warn};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Background task resolving one repository call.
///
/// Awaiting it is optional; dropping it does not cancel the call.
pub type PendingMutation = JoinHandle<()>;

/// In-memory state machine synchronizing with one wallet repository
#[derive(Clone)]
pub struct WalletEngine {
    repository: SharedRepository,
    state: Arc<StateBroadcaster>,
    runtime: Handle,
}

impl WalletEngine {
    /// Must be called from within a Tokio runtime; mutations are spawned on it.
    fn new(repository: SharedRepository) -> Self {
        Self {
            repository,
            state: Arc::new(StateBroadcaster::new(WalletState::Loading)),
            runtime: Handle::current(),
        }
    }

    /// Create an engine and wait for the initial load to resolve
    pub async fn create(repository: SharedRepository) -> Self {
        let engine = Self::new(repository);
        let next = resolve("load", engine.load_call()).await;
        engine.apply(next);
        engine
    }

    /// Create an engine in `Loading` and run the initial load in the background
    pub fn spawn(repository: SharedRepository) -> Self {
        let engine = Self::new(repository);
        let load = engine.load_call();
        engine.run("load", load);
        engine
    }

    fn load_call(&self) -> BoxFuture<'static, RepositoryResult> {
        let repository = Arc::clone(&self.repository);
        async move { repository.load().await }.boxed()
    }

    /// Set one currency to `new_value`.
    ///
    /// Negative values are ignored: no state change and no repository call.
    pub fn set_currency(&self, currency_id: &str, new_value: Amount) -> Option<PendingMutation> {
        if new_value < 0 {
            debug!(
                "Ignoring negative value {} for currency {}",
                new_value, currency_id
            );
            return None;
        }

        let repository = Arc::clone(&self.repository);
        let currency_id = currency_id.to_string();
        let call = async move { repository.set_one(&currency_id, new_value).await }.boxed();
        Some(self.dispatch("set_one", call))
    }

    /// Replace the whole wallet.
    ///
    /// A mapping holding any negative value is ignored like a negative `set_currency`.
    pub fn replace_wallet(&self, balances: Balances) -> Option<PendingMutation> {
        if let Some((currency_id, value)) = first_negative(&balances) {
            debug!(
                "Ignoring wallet replacement with negative value {} for currency {}",
                value, currency_id
            );
            return None;
        }

        let repository = Arc::clone(&self.repository);
        let call = async move { repository.replace_all(balances).await }.boxed();
        Some(self.dispatch("replace_all", call))
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> WalletState {
        self.state.current()
    }

    /// Subscribe to state transitions, starting with the current state
    pub fn state_changes(&self) -> StateSubscription {
        self.state.subscribe()
    }

    fn dispatch(
        &self,
        operation: &'static str,
        call: BoxFuture<'static, RepositoryResult>,
    ) -> PendingMutation {
        self.apply(WalletState::Loading);
        self.run(operation, call)
    }

    fn run(
        &self,
        operation: &'static str,
        call: BoxFuture<'static, RepositoryResult>,
    ) -> PendingMutation {
        let engine = self.clone();
        self.runtime.spawn(async move {
            let next = resolve(operation, call).await;
            engine.apply(next);
        })
    }

    fn apply(&self, next: WalletState) {
        debug!("Wallet state -> {}", next.kind());
        self.state.publish(next);
    }
}

async fn resolve(
    operation: &'static str,
    call: BoxFuture<'static, RepositoryResult>,
) -> WalletState {
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(balances)) => {
            debug!("Repository {} returned {} currencies", operation, balances.len());
            WalletState::valid(balances)
        }
        Ok(Err(err)) => {
            warn!("Repository {} failed: {}", operation, err);
            WalletState::error(err.to_string())
        }
        Err(payload) => {
            let err = WalletError::unexpected(format!(
                "repository {} panicked: {}",
                operation,
                panic_message(payload.as_ref())
            ));
            error!("{}", err);
            WalletState::error(err.to_string())
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
