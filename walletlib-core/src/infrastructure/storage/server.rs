//! HTTP wallet repository
//!
//! Talks to a wallet server exposing one resource per wallet:
//! `GET <host>/<walletId>` reads the mapping, `POST` replaces it and echoes
//! the stored mapping, `PUT {currencyId, value}` updates one currency.

use crate::domain::{RepositoryResult, WalletRepository};
use crate::shared::error::WalletError;
use crate::shared::types::{Amount, Balances, CurrencyUpdate};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub struct ServerWalletRepository {
    client: Client,
    wallet_uri: String,
}

impl ServerWalletRepository {
    pub fn new(host: &str, wallet_id: &str) -> Result<Self, WalletError> {
        Self::with_timeout(host, wallet_id, None)
    }

    /// Create a repository whose requests fail after `timeout`
    pub fn with_timeout(
        host: &str,
        wallet_id: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, WalletError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WalletError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            wallet_uri: format!("{}/{}", host.trim_end_matches('/'), wallet_id),
        })
    }

    pub fn wallet_uri(&self) -> &str {
        &self.wallet_uri
    }

    async fn balances_from(
        response: Response,
        not_found: impl FnOnce() -> WalletError,
    ) -> RepositoryResult {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found());
        }
        if !status.is_success() {
            return Err(WalletError::network(format!(
                "Server responded with code {}",
                status.as_u16()
            )));
        }
        Ok(response.json::<Balances>().await?)
    }

    fn missing_wallet(&self) -> WalletError {
        WalletError::wallet_not_found(format!("No wallet at {}", self.wallet_uri))
    }
}

#[async_trait]
impl WalletRepository for ServerWalletRepository {
    async fn load(&self) -> RepositoryResult {
        debug!("GET {}", self.wallet_uri);
        let response = self.client.get(&self.wallet_uri).send().await?;
        Self::balances_from(response, || self.missing_wallet()).await
    }

    async fn replace_all(&self, balances: Balances) -> RepositoryResult {
        debug!("POST {}", self.wallet_uri);
        let response = self
            .client
            .post(&self.wallet_uri)
            .json(&balances)
            .send()
            .await?;
        Self::balances_from(response, || self.missing_wallet()).await
    }

    async fn set_one(&self, currency_id: &str, new_value: Amount) -> RepositoryResult {
        debug!("PUT {} {}={}", self.wallet_uri, currency_id, new_value);
        let response = self
            .client
            .put(&self.wallet_uri)
            .json(&CurrencyUpdate::new(currency_id, new_value))
            .send()
            .await?;
        Self::balances_from(response, || WalletError::currency_not_found(currency_id)).await
    }
}
