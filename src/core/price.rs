//! Market-data abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Latest known price per symbol.
pub type RateMap = BTreeMap<String, f64>;

#[async_trait]
pub trait TickerProvider: Send + Sync {
    /// Last traded price for a symbol such as `btcusd`.
    async fn fetch_last_price(&self, symbol: &str) -> Result<f64>;
}
