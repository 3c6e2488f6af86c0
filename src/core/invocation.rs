//! Single entry point: one invocation does one unit of work.

use crate::core::error::InvocationError;
use crate::core::price::TickerProvider;
use crate::core::rotation::refresh_next_group;
use crate::core::state::{PersistedState, StateStore};
use crate::core::symbols::SymbolGroups;
use crate::core::valuation::{ValuationResult, value_wallet};
use crate::core::wallet::WalletProvider;
use serde::Serialize;
use tracing::info;

/// Query flags of an invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub summary: Option<String>,
}

impl Request {
    /// Builds a request from `key=value` query pairs. Unknown keys are ignored.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut request = Request::default();
        for (key, value) in pairs {
            if key.as_ref() == "summary" {
                request.summary = Some(value.into());
            }
        }
        request
    }

    /// Only the literal `"true"` selects the valuation path.
    pub fn wants_summary(&self) -> bool {
        self.summary.as_deref() == Some("true")
    }
}

/// Success payload of an invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Valuation(ValuationResult),
    Rates(PersistedState),
}

/// Collaborators available to an invocation.
pub struct Context<'a> {
    pub store: &'a dyn StateStore,
    pub ticker: &'a dyn TickerProvider,
    pub wallet: &'a dyn WalletProvider,
    pub groups: &'a SymbolGroups,
}

pub async fn handle(ctx: &Context<'_>, request: &Request) -> Result<Response, InvocationError> {
    if request.wants_summary() {
        info!("NEW_GET_BALANCES_REQUEST");
        value_wallet(ctx.wallet, ctx.store)
            .await
            .map(Response::Valuation)
    } else {
        info!("NEW_GET_RATES_REQUEST");
        refresh_next_group(ctx.store, ctx.ticker, ctx.groups)
            .await
            .map(Response::Rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::tests::MockTicker;
    use crate::core::symbols::SYMBOLS;
    use crate::core::wallet::WalletEntry;
    use crate::store::memory::MemoryStore;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::Ordering;

    struct FixedWallet;

    #[async_trait]
    impl WalletProvider for FixedWallet {
        async fn fetch_wallet(&self) -> Result<Vec<WalletEntry>> {
            Ok(vec![WalletEntry::new("usd", "12.5")])
        }
    }

    fn summary_request() -> Request {
        Request {
            summary: Some("true".to_string()),
        }
    }

    #[test]
    fn test_request_from_query() {
        let request = Request::from_query([("foo", "bar"), ("summary", "true")]);
        assert!(request.wants_summary());

        let request = Request::from_query([("summary", "yes")]);
        assert!(!request.wants_summary());

        let request = Request::from_query(Vec::<(String, String)>::new());
        assert!(!request.wants_summary());
        assert_eq!(request, Request::default());
    }

    #[tokio::test]
    async fn test_summary_request_values_wallet() {
        let store = MemoryStore::new();
        let ticker = MockTicker::uniform(SYMBOLS, 1.0);
        let groups = SymbolGroups::standard();
        let ctx = Context {
            store: &store,
            ticker: &ticker,
            wallet: &FixedWallet,
            groups: &groups,
        };

        let response = handle(&ctx, &summary_request()).await.unwrap();

        match response {
            Response::Valuation(result) => assert_eq!(result.total_value, 12.5),
            other => panic!("Expected valuation, got {other:?}"),
        }
        assert_eq!(ticker.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_default_request_refreshes_rates() {
        let store = MemoryStore::new();
        let ticker = MockTicker::uniform(SYMBOLS, 1.0);
        let groups = SymbolGroups::standard();
        let ctx = Context {
            store: &store,
            ticker: &ticker,
            wallet: &FixedWallet,
            groups: &groups,
        };

        let response = handle(&ctx, &Request::default()).await.unwrap();

        match response {
            Response::Rates(state) => assert_eq!(state.next_group, Some(1)),
            other => panic!("Expected rates, got {other:?}"),
        }
    }
}
