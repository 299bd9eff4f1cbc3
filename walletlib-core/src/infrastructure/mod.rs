//! Infrastructure layer
//!
//! Persistence backends for the wallet and the configuration that selects
//! between them.

pub mod config;
pub mod platform;
pub mod storage;

pub use self::config::{RepositoryConfig, WalletConfig};
pub use platform::{DirectoryStore, KeyValueStore, MemoryStore};
pub use storage::*;
