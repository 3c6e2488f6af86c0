//! The persisted rotation document and the store that holds it.

use crate::core::price::RateMap;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Durable state shared across invocations.
///
/// `rates` only holds symbols from groups that were refreshed at least once;
/// a missing key means "never fetched". `next_group` is absent until the first
/// successful refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub rates: RateMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_group: Option<usize>,
}

impl PersistedState {
    /// Index of the group to refresh next, given `group_count` groups.
    pub fn next_group_index(&self, group_count: usize) -> usize {
        match self.next_group {
            None => 0,
            Some(index) if index < group_count => index,
            Some(index) => {
                let wrapped = index % group_count.max(1);
                warn!(
                    stored = index,
                    wrapped, "Stored nextGroup out of range, wrapping"
                );
                wrapped
            }
        }
    }

    /// Overwrites the rates of one refreshed group and advances the pointer.
    /// Rates of other symbols are left untouched.
    pub fn apply_refresh(&mut self, group: usize, fresh: RateMap, group_count: usize) {
        self.rates.extend(fresh);
        self.next_group = Some((group + 1) % group_count.max(1));
    }
}

/// Read/write access to the single persisted document.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current document, or the empty document if nothing was written yet.
    async fn read(&self) -> Result<PersistedState>;

    /// Replaces the document and returns what was written.
    async fn write(&self, state: PersistedState) -> Result<PersistedState>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_deserializes_to_default() {
        let state: PersistedState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, PersistedState::default());
        assert_eq!(state.next_group_index(3), 0);
    }

    #[test]
    fn test_document_layout() {
        let mut state = PersistedState::default();
        state.rates.insert("btcusd".to_string(), 100.5);
        state.next_group = Some(1);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "rates": { "btcusd": 100.5 }, "nextGroup": 1 })
        );
    }

    #[test]
    fn test_out_of_range_pointer_wraps() {
        let state = PersistedState {
            rates: RateMap::new(),
            next_group: Some(4),
        };
        assert_eq!(state.next_group_index(3), 1);
    }

    #[test]
    fn test_apply_refresh_overwrites_only_fresh_symbols() {
        let mut state = PersistedState::default();
        state.rates.insert("btcusd".to_string(), 1.0);
        state.rates.insert("eosusd".to_string(), 2.0);

        let fresh = RateMap::from([("btcusd".to_string(), 10.0), ("ltcusd".to_string(), 3.0)]);
        state.apply_refresh(2, fresh, 3);

        assert_eq!(state.rates["btcusd"], 10.0);
        assert_eq!(state.rates["ltcusd"], 3.0);
        assert_eq!(state.rates["eosusd"], 2.0);
        assert_eq!(state.next_group, Some(0));
    }
}
