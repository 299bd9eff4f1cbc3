//! Domain repositories
//!
//! This module contains the repository trait for wallet persistence.

pub mod wallet_repository;

// Re-export repositories
pub use wallet_repository::*;
