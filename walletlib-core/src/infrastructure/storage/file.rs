//! File wallet repository
//!
//! The wallet is one flat `currency -> amount` document on disk, encoded as
//! JSON or with `bincode`. Every mutation rewrites the whole file.

use crate::domain::{RepositoryResult, WalletRepository};
use crate::shared::constants::{DATA_DIR_NAME, FALLBACK_DATA_DIR};
use crate::shared::error::WalletError;
use crate::shared::types::{Amount, Balances, FileFormat};
use crate::shared::utils::{reconcile_currencies, zeroed_balances};
use async_trait::async_trait;
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Construction options for [`FileWalletRepository`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRepositoryOptions {
    pub format: FileFormat,
    /// Reset every stored amount to zero when opening an existing file
    pub create_clean: bool,
    /// Insert currencies the document does not know on `set_one`.
    /// Enabled by default.
    pub auto_create: bool,
}

impl Default for FileRepositoryOptions {
    fn default() -> Self {
        Self {
            format: FileFormat::default(),
            create_clean: false,
            auto_create: true,
        }
    }
}

pub struct FileWalletRepository {
    path: PathBuf,
    format: FileFormat,
    auto_create: bool,
    write_lock: Mutex<()>,
}

impl FileWalletRepository {
    /// Open the wallet file at `path`, creating it if missing.
    ///
    /// Listed currencies absent from an existing document are added at
    /// zero; the file is rewritten only when that changes it.
    pub async fn create<C: AsRef<str>>(
        currencies: &[C],
        path: impl Into<PathBuf>,
        options: FileRepositoryOptions,
    ) -> Result<Self, WalletError> {
        let repository = Self {
            path: path.into(),
            format: options.format,
            auto_create: options.auto_create,
            write_lock: Mutex::new(()),
        };

        if let Some(parent) = repository.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    WalletError::storage(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        if fs::try_exists(&repository.path).await? {
            let mut balances = repository.read().await?;
            if reconcile_currencies(&mut balances, currencies, options.create_clean) {
                debug!("Reconciled wallet file {}", repository.path.display());
                repository.write(&balances).await?;
            }
        } else {
            info!(
                "Creating wallet file {} with {} currencies",
                repository.path.display(),
                currencies.len()
            );
            repository.write(&zeroed_balances(currencies)).await?;
        }

        Ok(repository)
    }

    /// Default location of a wallet file: `<data_dir>/walletlib/<name>.<ext>`
    pub fn default_path(file_name: &str, format: FileFormat) -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
            .join(DATA_DIR_NAME)
            .join(format!("{}.{}", file_name, format.extension()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    async fn read(&self) -> RepositoryResult {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WalletError::wallet_not_found(format!(
                    "Cannot find wallet file {}",
                    self.path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };
        decode(self.format, &data)
    }

    async fn write(&self, balances: &Balances) -> Result<(), WalletError> {
        let data = encode(self.format, balances)?;
        fs::write(&self.path, data).await?;
        Ok(())
    }
}

fn encode(format: FileFormat, balances: &Balances) -> Result<Vec<u8>, WalletError> {
    match format {
        FileFormat::Json => Ok(serde_json::to_vec(balances)?),
        FileFormat::Binary => Ok(bincode::serde::encode_to_vec(
            balances,
            bincode::config::standard(),
        )?),
    }
}

fn decode(format: FileFormat, data: &[u8]) -> RepositoryResult {
    match format {
        FileFormat::Json => Ok(serde_json::from_slice(data)?),
        FileFormat::Binary => {
            let (balances, _) =
                bincode::serde::decode_from_slice(data, bincode::config::standard())?;
            Ok(balances)
        }
    }
}

#[async_trait]
impl WalletRepository for FileWalletRepository {
    async fn load(&self) -> RepositoryResult {
        self.read().await
    }

    async fn replace_all(&self, balances: Balances) -> RepositoryResult {
        let _guard = self.write_lock.lock().await;
        self.write(&balances).await?;
        Ok(balances)
    }

    async fn set_one(&self, currency_id: &str, new_value: Amount) -> RepositoryResult {
        let _guard = self.write_lock.lock().await;
        let mut balances = self.read().await?;
        match balances.get_mut(currency_id) {
            Some(value) => *value = new_value,
            None if self.auto_create => {
                balances.insert(currency_id.to_string(), new_value);
            }
            None => return Err(WalletError::currency_not_found(currency_id)),
        }
        self.write(&balances).await?;
        Ok(balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::balances;
    use tempfile::TempDir;

    fn wallet_path(dir: &TempDir, format: FileFormat) -> PathBuf {
        dir.path()
            .join("wallets")
            .join(format!("player.{}", format.extension()))
    }

    async fn open(
        dir: &TempDir,
        currencies: &[&str],
        options: FileRepositoryOptions,
    ) -> FileWalletRepository {
        FileWalletRepository::create(currencies, wallet_path(dir, options.format), options)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_writes_zeroed_document() {
        let dir = tempfile::tempdir().unwrap();
        let repository = open(&dir, &["gold", "gems"], FileRepositoryOptions::default()).await;

        let raw = std::fs::read(repository.path()).unwrap();
        let stored: Balances = serde_json::from_slice(&raw).unwrap();
        assert_eq!(stored, balances(&[("gold", 0), ("gems", 0)]));
    }

    #[tokio::test]
    async fn test_both_codecs_survive_reopen() {
        for format in [FileFormat::Json, FileFormat::Binary] {
            let dir = tempfile::tempdir().unwrap();
            let options = FileRepositoryOptions {
                format,
                ..Default::default()
            };

            let repository = open(&dir, &["gold", "gems"], options).await;
            repository.set_one("gold", 250).await.unwrap();
            drop(repository);

            let reopened = open(&dir, &["gold", "gems", "keys"], options).await;
            assert_eq!(reopened.format(), format);
            assert_eq!(
                reopened.load().await.unwrap(),
                balances(&[("gold", 250), ("gems", 0), ("keys", 0)])
            );
        }
    }

    #[tokio::test]
    async fn test_create_clean_resets_existing_amounts() {
        let dir = tempfile::tempdir().unwrap();
        let repository = open(&dir, &["gold"], FileRepositoryOptions::default()).await;
        repository
            .replace_all(balances(&[("gold", 7), ("legacy", 2)]))
            .await
            .unwrap();

        let clean = open(
            &dir,
            &["gold", "gems"],
            FileRepositoryOptions {
                create_clean: true,
                ..Default::default()
            },
        )
        .await;
        assert_eq!(
            clean.load().await.unwrap(),
            balances(&[("gold", 0), ("legacy", 0), ("gems", 0)])
        );
    }

    #[tokio::test]
    async fn test_set_one_inserts_unknown_currency_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let repository = open(&dir, &["gold"], FileRepositoryOptions::default()).await;

        assert_eq!(
            repository.set_one("gems", 3).await.unwrap(),
            balances(&[("gold", 0), ("gems", 3)])
        );
        assert_eq!(
            repository.load().await.unwrap(),
            balances(&[("gold", 0), ("gems", 3)])
        );
    }

    #[tokio::test]
    async fn test_set_one_unknown_currency_rejected_without_auto_create() {
        let dir = tempfile::tempdir().unwrap();
        let strict = open(
            &dir,
            &["gold"],
            FileRepositoryOptions {
                auto_create: false,
                ..Default::default()
            },
        )
        .await;

        assert_eq!(
            strict.set_one("gems", 3).await.unwrap_err(),
            WalletError::currency_not_found("gems")
        );
        assert_eq!(strict.load().await.unwrap(), balances(&[("gold", 0)]));
    }

    #[tokio::test]
    async fn test_concurrent_writes_do_not_tear_document() {
        let dir = tempfile::tempdir().unwrap();
        let currencies: Vec<String> = (0..8).map(|i| format!("c{}", i)).collect();
        let repository = std::sync::Arc::new(
            FileWalletRepository::create(
                &currencies,
                wallet_path(&dir, FileFormat::Json),
                FileRepositoryOptions::default(),
            )
            .await
            .unwrap(),
        );

        let mut handles = vec![];
        for (i, currency) in currencies.iter().cloned().enumerate() {
            let repository = repository.clone();
            handles.push(tokio::spawn(async move {
                repository.set_one(&currency, i as Amount + 1).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = repository.load().await.unwrap();
        for (i, currency) in currencies.iter().enumerate() {
            assert_eq!(stored[currency], i as Amount + 1);
        }
    }

    #[tokio::test]
    async fn test_missing_or_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let repository = open(&dir, &["gold"], FileRepositoryOptions::default()).await;

        std::fs::write(repository.path(), b"not json").unwrap();
        assert!(matches!(
            repository.load().await.unwrap_err(),
            WalletError::Serialization(_)
        ));

        std::fs::remove_file(repository.path()).unwrap();
        assert!(repository.load().await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_default_path_uses_format_extension() {
        let path = FileWalletRepository::default_path("WalletFile", FileFormat::Binary);
        assert!(path.ends_with(format!("{}/WalletFile.dat", DATA_DIR_NAME)));
    }
}
