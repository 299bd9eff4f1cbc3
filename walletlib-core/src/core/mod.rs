//! Core wallet functionality
//!
//! The engine owning the observable wallet state, the broadcaster that
//! publishes it, the controller's business rules, and startup wiring.

pub mod broadcast;
pub mod controller;
pub mod startup;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::{StateBroadcaster, StateSubscription};
pub use controller::WalletController;
pub use startup::WalletStartup;
pub use wallet::{PendingMutation, WalletEngine};
