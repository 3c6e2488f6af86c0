use crate::core::error::InvocationError;
use crate::core::price::{RateMap, TickerProvider};
use anyhow::anyhow;
use futures::future::try_join_all;
use tracing::debug;

/// Fetches the last price of every symbol in `group` concurrently.
///
/// The group is all-or-nothing: the first failing lookup fails the whole
/// fetch and the results of the other lookups are dropped.
pub async fn fetch_group_rates(
    provider: &dyn TickerProvider,
    group: &[String],
) -> Result<RateMap, InvocationError> {
    let lookups = group.iter().map(|symbol| async move {
        debug!(%symbol, "Fetching rate");
        let price = provider
            .fetch_last_price(symbol)
            .await
            .map_err(|source| InvocationError::Fetch {
                symbol: symbol.clone(),
                source,
            })?;

        if !price.is_finite() || price <= 0.0 {
            return Err(InvocationError::Fetch {
                symbol: symbol.clone(),
                source: anyhow!("Invalid price {price}"),
            });
        }
        debug!(%symbol, price, "Fetched rate");
        Ok::<_, InvocationError>((symbol.clone(), price))
    });

    let rates = try_join_all(lookups).await?;
    Ok(rates.into_iter().collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Ticker returning canned prices; unknown symbols fail.
    pub(crate) struct MockTicker {
        prices: HashMap<String, f64>,
        pub(crate) calls: AtomicUsize,
    }

    impl MockTicker {
        pub(crate) fn new(prices: &[(&str, f64)]) -> Self {
            Self {
                prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
                calls: AtomicUsize::new(0),
            }
        }

        /// Every symbol priced at `price`.
        pub(crate) fn uniform(symbols: &[&str], price: f64) -> Self {
            let prices: Vec<(&str, f64)> = symbols.iter().map(|s| (*s, price)).collect();
            Self::new(&prices)
        }
    }

    #[async_trait]
    impl TickerProvider for MockTicker {
        async fn fetch_last_price(&self, symbol: &str) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prices
                .get(symbol)
                .copied()
                .ok_or_else(|| anyhow!("Unknown symbol: {symbol}"))
        }
    }

    fn group(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_group_rates_maps_symbol_to_price() {
        let ticker = MockTicker::new(&[("btcusd", 100.0), ("ethusd", 10.0), ("ltcusd", 5.0)]);

        let rates = fetch_group_rates(&ticker, &group(&["btcusd", "ethusd"]))
            .await
            .unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates["btcusd"], 100.0);
        assert_eq!(rates["ethusd"], 10.0);
        assert!(!rates.contains_key("ltcusd"));
    }

    #[tokio::test]
    async fn test_single_failure_fails_whole_group() {
        let ticker = MockTicker::new(&[("btcusd", 100.0)]);

        let err = fetch_group_rates(&ticker, &group(&["btcusd", "xxxusd"]))
            .await
            .unwrap_err();

        match err {
            InvocationError::Fetch { symbol, .. } => assert_eq!(symbol, "xxxusd"),
            other => panic!("Expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_positive_price_is_a_failure() {
        let ticker = MockTicker::new(&[("btcusd", 100.0), ("ethusd", 0.0)]);

        let result = fetch_group_rates(&ticker, &group(&["btcusd", "ethusd"])).await;

        assert!(matches!(result, Err(InvocationError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_empty_group_fetches_nothing() {
        let ticker = MockTicker::new(&[]);

        let rates = fetch_group_rates(&ticker, &[]).await.unwrap();

        assert!(rates.is_empty());
        assert_eq!(ticker.calls.load(Ordering::SeqCst), 0);
    }
}
