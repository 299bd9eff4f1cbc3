//! Domain layer - entities and repositories
//!
//! This module contains the wallet state value and the repository contract
//! every persistence backend implements.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
