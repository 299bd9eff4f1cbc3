//! Wallet repositories
//!
//! Reference implementations of `WalletRepository`: in memory, on a
//! key-value store, in a local file, and on a remote wallet server.

pub mod file;
pub mod key_value;
pub mod memory;
pub mod server;

pub use file::{FileRepositoryOptions, FileWalletRepository};
pub use key_value::KeyValueWalletRepository;
pub use memory::InMemoryWalletRepository;
pub use server::ServerWalletRepository;
