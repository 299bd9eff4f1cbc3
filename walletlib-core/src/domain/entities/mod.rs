//! Domain entities

pub mod wallet_state;

pub use wallet_state::*;
