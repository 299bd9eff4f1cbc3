//! Wallet configuration
//!
//! Selects and parameterizes the persistence backend. Values come from an
//! optional `wallet.{toml,json,yaml}` file, then `WALLET__*` environment
//! variables (`.env` honoured), e.g. `WALLET__REPOSITORY__BACKEND=server`
//! or `WALLET__CURRENCIES=gold,gems`.

use crate::domain::SharedRepository;
use crate::infrastructure::platform::DirectoryStore;
use crate::infrastructure::storage::{
    FileRepositoryOptions, FileWalletRepository, InMemoryWalletRepository,
    KeyValueWalletRepository, ServerWalletRepository,
};
use crate::shared::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, CONFIG_FILE_NAME, DEFAULT_SERVER_HOST,
    DEFAULT_WALLET_FILE_NAME, DEFAULT_WALLET_ID, DEFAULT_WALLET_KEY,
};
use crate::shared::error::WalletError;
use crate::shared::types::FileFormat;
use crate::shared::utils::zeroed_balances;
use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, Environment, File};
use dotenv::dotenv;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Currencies every local wallet document is guaranteed to hold
    pub currencies: Vec<String>,
    /// Reset stored amounts to zero when opening a local wallet
    pub create_clean: bool,
    pub repository: RepositoryConfig,
}

/// Backend selection, tagged by `backend`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum RepositoryConfig {
    Memory,
    File {
        /// Defaults to the OS data directory
        #[serde(default)]
        directory: Option<PathBuf>,
        #[serde(default = "default_file_name")]
        file_name: String,
        #[serde(default)]
        format: FileFormat,
        #[serde(default = "default_auto_create")]
        auto_create: bool,
    },
    KeyValue {
        #[serde(default)]
        directory: Option<PathBuf>,
        #[serde(default = "default_wallet_key")]
        wallet_key: String,
    },
    Server {
        #[serde(default = "default_host")]
        host: String,
        #[serde(default = "default_wallet_id")]
        wallet_id: String,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

fn default_file_name() -> String {
    DEFAULT_WALLET_FILE_NAME.to_string()
}

fn default_auto_create() -> bool {
    true
}

fn default_wallet_key() -> String {
    DEFAULT_WALLET_KEY.to_string()
}

fn default_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

fn default_wallet_id() -> String {
    DEFAULT_WALLET_ID.to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::File {
            directory: None,
            file_name: default_file_name(),
            format: FileFormat::default(),
            auto_create: default_auto_create(),
        }
    }
}

impl RepositoryConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File { .. } => "file",
            Self::KeyValue { .. } => "key_value",
            Self::Server { .. } => "server",
        }
    }
}

impl WalletConfig {
    /// Load from `wallet.*` in the working directory (if present) and the
    /// environment
    pub fn load() -> Result<Self, WalletError> {
        dotenv().ok();
        let file = File::with_name(CONFIG_FILE_NAME).required(false);
        Self::from_builder(::config::Config::builder().add_source(file))
    }

    /// Load from an explicit file, still overridable by the environment
    pub fn load_from(path: &Path) -> Result<Self, WalletError> {
        dotenv().ok();
        Self::from_builder(::config::Config::builder().add_source(File::from(path)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, WalletError> {
        let config: Self = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator(CONFIG_ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("currencies"),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if let Some(blank) = self.currencies.iter().find(|c| c.trim().is_empty()) {
            return Err(WalletError::config(format!(
                "Currency ids cannot be blank: {:?}",
                blank
            )));
        }

        match &self.repository {
            RepositoryConfig::Memory => {}
            RepositoryConfig::File { file_name, .. } => {
                if file_name.is_empty() {
                    return Err(WalletError::config("Wallet file name cannot be empty"));
                }
            }
            RepositoryConfig::KeyValue { wallet_key, .. } => {
                if wallet_key.is_empty() {
                    return Err(WalletError::config("Wallet key cannot be empty"));
                }
            }
            RepositoryConfig::Server {
                host,
                wallet_id,
                timeout_secs,
            } => {
                if !(host.starts_with("http://") || host.starts_with("https://")) {
                    return Err(WalletError::config(format!(
                        "Invalid server host: {}",
                        host
                    )));
                }
                if wallet_id.is_empty() {
                    return Err(WalletError::config("Wallet id cannot be empty"));
                }
                if *timeout_secs == Some(0) {
                    return Err(WalletError::config("Server timeout must be positive"));
                }
            }
        }
        Ok(())
    }

    /// Construct the configured backend.
    ///
    /// Local backends are opened (and created or reconciled) here.
    pub async fn build_repository(&self) -> Result<SharedRepository, WalletError> {
        let repository: SharedRepository = match &self.repository {
            RepositoryConfig::Memory => Arc::new(InMemoryWalletRepository::new(zeroed_balances(
                &self.currencies,
            ))),
            RepositoryConfig::File {
                directory,
                file_name,
                format,
                auto_create,
            } => {
                let path = match directory {
                    Some(directory) => {
                        directory.join(format!("{}.{}", file_name, format.extension()))
                    }
                    None => FileWalletRepository::default_path(file_name, *format),
                };
                let options = FileRepositoryOptions {
                    format: *format,
                    create_clean: self.create_clean,
                    auto_create: *auto_create,
                };
                Arc::new(FileWalletRepository::create(&self.currencies, path, options).await?)
            }
            RepositoryConfig::KeyValue {
                directory,
                wallet_key,
            } => {
                let store = match directory {
                    Some(directory) => DirectoryStore::at(directory)?,
                    None => DirectoryStore::new()?,
                };
                Arc::new(KeyValueWalletRepository::create(
                    store,
                    &self.currencies,
                    wallet_key.clone(),
                    self.create_clean,
                )?)
            }
            RepositoryConfig::Server {
                host,
                wallet_id,
                timeout_secs,
            } => Arc::new(ServerWalletRepository::with_timeout(
                host,
                wallet_id,
                timeout_secs.map(Duration::from_secs),
            )?),
        };

        info!(
            "Using {} wallet backend with {} configured currencies",
            self.repository.backend_name(),
            self.currencies.len()
        );
        Ok(repository)
    }
}
