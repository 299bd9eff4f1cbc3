//! Wallet startup
//!
//! Creates the engine for a repository, starts its initial load, and hands
//! out the controller once that load has resolved.

use crate::core::controller::WalletController;
use crate::core::wallet::WalletEngine;
use crate::domain::{SharedRepository, WalletState};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use log::{error, info};

/// Entry point owning one wallet engine.
///
/// Construct it once and pass it to whatever needs the wallet.
pub struct WalletStartup {
    engine: WalletEngine,
    controller: Shared<BoxFuture<'static, WalletController>>,
}

impl WalletStartup {
    /// Spawn the engine and begin loading. Must run inside a Tokio runtime.
    pub fn launch(repository: SharedRepository) -> Self {
        let engine = WalletEngine::spawn(repository);

        let mut errors = engine.state_changes();
        tokio::spawn(async move {
            while let Some(state) = errors.recv().await {
                if let WalletState::Error { message } = state {
                    error!("Wallet error: {}", message);
                }
            }
        });

        let mut loaded = engine.state_changes();
        let ready_engine = engine.clone();
        let controller = async move {
            if let Some(state) = loaded.wait_for(|state| !state.is_loading()).await {
                info!("Initial wallet load finished: {}", state.kind());
            }
            WalletController::new(ready_engine)
        }
        .boxed()
        .shared();

        Self { engine, controller }
    }

    /// The controller, available once the initial load has resolved.
    ///
    /// Every call resolves to a handle on the same engine.
    pub async fn controller(&self) -> WalletController {
        self.controller.clone().await
    }

    pub fn engine(&self) -> &WalletEngine {
        &self.engine
    }

    pub fn current_state(&self) -> WalletState {
        self.engine.current_state()
    }
}
