//! Wallet controller
//!
//! Business-level operations on top of a [`WalletEngine`]. Operations that
//! cannot apply to the current state are declined with a log line and never
//! reach the repository.

use crate::core::broadcast::StateSubscription;
use crate::core::wallet::{PendingMutation, WalletEngine};
use crate::domain::WalletState;
use crate::shared::types::Amount;
use log::{error, warn};

#[derive(Clone)]
pub struct WalletController {
    engine: WalletEngine,
}

impl WalletController {
    pub fn new(engine: WalletEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &WalletEngine {
        &self.engine
    }

    pub fn current_state(&self) -> WalletState {
        self.engine.current_state()
    }

    pub fn state_changes(&self) -> StateSubscription {
        self.engine.state_changes()
    }

    /// Add `delta` (possibly negative) to one currency.
    ///
    /// Declined unless the wallet is valid and holds `currency_id`. A result
    /// below zero is dropped by the engine.
    pub fn add_cash(&self, currency_id: &str, delta: Amount) -> Option<PendingMutation> {
        let state = self.current_state();
        if !self.wallet_is_valid(&state) {
            return None;
        }

        let Some(current) = state.balance(currency_id) else {
            error!("Cannot add cash to unknown currency {}", currency_id);
            return None;
        };

        match current.checked_add(delta) {
            Some(updated) => self.engine.set_currency(currency_id, updated),
            None => {
                error!(
                    "Adding {} to {} {} overflows, declined",
                    delta, current, currency_id
                );
                None
            }
        }
    }

    /// Set one currency to zero.
    ///
    /// The currency is not checked locally; a backend without it answers
    /// with an error state.
    pub fn clear_currency(&self, currency_id: &str) -> Option<PendingMutation> {
        if !self.wallet_is_valid(&self.current_state()) {
            return None;
        }
        self.engine.set_currency(currency_id, 0)
    }

    fn wallet_is_valid(&self, state: &WalletState) -> bool {
        match state {
            WalletState::Valid { .. } => true,
            WalletState::Loading => {
                warn!("Wallet is loading right now");
                false
            }
            WalletState::Error { message } => {
                error!("Wallet is in error state: {}", message);
                false
            }
        }
    }
}
