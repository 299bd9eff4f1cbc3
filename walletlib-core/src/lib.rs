//! WalletLib Core
//!
//! Observable multi-currency wallet state kept in sync with a pluggable
//! persistence backend.
//!
//! ## Architecture
//!
//! - **Core**: the wallet engine and its state broadcaster, the controller
//!   enforcing business rules, and startup wiring
//! - **Domain**: the `WalletState` value and the `WalletRepository` contract
//! - **Infrastructure**: in-memory, file, key-value and HTTP repositories,
//!   plus configuration selecting one of them
//! - **Shared**: common types, constants, utilities and the error type
//!
//! ## Usage
//!
//! ```no_run
//! use walletlib_core::{init_logging, init_wallet_core};
//!
//! # async fn run() -> Result<(), walletlib_core::WalletError> {
//! init_logging();
//! let startup = init_wallet_core().await?;
//! let controller = startup.controller().await;
//!
//! let mut changes = controller.state_changes();
//! controller.add_cash("gold", 20);
//! while let Some(state) = changes.recv().await {
//!     println!("wallet is now {}", state.kind());
//! }
//! # Ok(())
//! # }
//! ```

use log::info;

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main components
pub use crate::core::{
    PendingMutation, StateSubscription, WalletController, WalletEngine, WalletStartup,
};
pub use domain::{
    RepositoryResult, SharedRepository, WalletRepository, WalletState, WalletStateKind,
};
pub use infrastructure::{RepositoryConfig, WalletConfig};
pub use shared::error::WalletError;
pub use shared::types::{Amount, Balances, CurrencyId};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging, honouring `RUST_LOG` and defaulting to `info`.
///
/// Safe to call more than once.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or(shared::constants::DEFAULT_LOG_FILTER);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Load the configuration from `wallet.*`, `.env` and the environment, then
/// start the configured wallet
pub async fn init_wallet_core() -> Result<WalletStartup, WalletError> {
    let config = WalletConfig::load()?;
    init_wallet_core_with(&config).await
}

/// Start a wallet from an explicit configuration
pub async fn init_wallet_core_with(config: &WalletConfig) -> Result<WalletStartup, WalletError> {
    info!("Starting {} v{}", NAME, VERSION);
    let repository = config.build_repository().await?;
    Ok(WalletStartup::launch(repository))
}
