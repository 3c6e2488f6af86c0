//! Round-robin refresh of one symbol group per invocation.
//!
//! A full market refresh is spread over `GROUP_COUNT` invocations so each one
//! issues a bounded number of ticker requests. The rotation pointer and the
//! merged rates are committed together in a single store write.
//!
//! The read-modify-write is not guarded: two overlapping refreshes can both
//! read the same document and the later write wins.

use crate::core::error::InvocationError;
use crate::core::fetch::fetch_group_rates;
use crate::core::price::TickerProvider;
use crate::core::state::{PersistedState, StateStore};
use crate::core::symbols::SymbolGroups;
use tracing::{error, info, instrument};

/// Refreshes the next group in the rotation and returns the written state.
///
/// Nothing is written unless every rate of the group was fetched.
#[instrument(name = "GET_RATES", skip_all)]
pub async fn refresh_next_group(
    store: &dyn StateStore,
    ticker: &dyn TickerProvider,
    groups: &SymbolGroups,
) -> Result<PersistedState, InvocationError> {
    let mut state = store.read().await.map_err(|e| {
        error!(error = %e, "GET_STORE_ERROR");
        InvocationError::StoreRead(e)
    })?;

    let group_index = state.next_group_index(groups.len());
    let group = groups.get(group_index).unwrap_or_default();
    info!(group = group_index, symbols = group.len(), "Getting rates for group");

    let fresh = fetch_group_rates(ticker, group).await.inspect_err(|e| {
        error!(error = %e, group = group_index, "Group fetch failed, store left unchanged");
    })?;

    state.apply_refresh(group_index, fresh, groups.len());

    let written = store.write(state).await.map_err(|e| {
        error!(error = %e, "SET_STORE_ERROR");
        InvocationError::StoreWrite(e)
    })?;
    info!(
        group = group_index,
        next_group = ?written.next_group,
        rates = written.rates.len(),
        "Rates refreshed"
    );
    Ok(written)
}
