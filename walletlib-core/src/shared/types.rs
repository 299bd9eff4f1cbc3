use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Basic types for wallet operations
pub type CurrencyId = String;
pub type Amount = i64;
pub type Balances = HashMap<CurrencyId, Amount>;

/// Body of a single-currency update sent to a wallet server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyUpdate {
    pub currency_id: CurrencyId,
    pub value: Amount,
}

impl CurrencyUpdate {
    pub fn new(currency_id: impl Into<CurrencyId>, value: Amount) -> Self {
        Self {
            currency_id: currency_id.into(),
            value,
        }
    }
}

/// Serialization format of a file-backed wallet document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    #[default]
    Json,
    Binary,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Binary => "dat",
        }
    }
}
