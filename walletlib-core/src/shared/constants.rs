//! Constants for the wallet core
//!
//! Defaults used when a backend is configured without explicit values.

// Server backend
pub const DEFAULT_SERVER_HOST: &str = "http://localhost:5000";
pub const DEFAULT_WALLET_ID: &str = "WalletId";

// Local backends
pub const DEFAULT_WALLET_FILE_NAME: &str = "WalletFile";
pub const DEFAULT_WALLET_KEY: &str = "WalletKey";
pub const DATA_DIR_NAME: &str = "walletlib";
pub const FALLBACK_DATA_DIR: &str = "./wallet_storage";
pub const KEY_VALUE_EXTENSION: &str = "kv";

// Configuration
pub const CONFIG_FILE_NAME: &str = "wallet";
pub const CONFIG_ENV_PREFIX: &str = "WALLET";
pub const CONFIG_ENV_SEPARATOR: &str = "__";
pub const DEFAULT_LOG_FILTER: &str = "info";
