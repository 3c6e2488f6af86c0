//! Account holdings abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single holding as reported by the exchange. A currency may appear
/// more than once, e.g. once per sub-wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub wallet_type: Option<String>,
    pub currency: String,
    pub amount: String,
}

impl WalletEntry {
    pub fn new(currency: &str, amount: &str) -> Self {
        Self {
            wallet_type: None,
            currency: currency.to_string(),
            amount: amount.to_string(),
        }
    }
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn fetch_wallet(&self) -> Result<Vec<WalletEntry>>;
}
