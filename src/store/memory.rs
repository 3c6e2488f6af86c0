use crate::core::state::{PersistedState, StateStore};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory state store, used by tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Option<PersistedState>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `state`.
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(state))),
        }
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn read(&self) -> Result<PersistedState> {
        let state = self.inner.lock().await;
        if state.is_none() {
            debug!("Store empty");
        }
        Ok(state.clone().unwrap_or_default())
    }

    async fn write(&self, state: PersistedState) -> Result<PersistedState> {
        let mut current = self.inner.lock().await;
        debug!(rates = state.rates.len(), next_group = ?state.next_group, "Store PUT");
        *current = Some(state.clone());
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(store.read().await.unwrap(), PersistedState::default());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = MemoryStore::new();
        let mut state = PersistedState::default();
        state.rates.insert("btcusd".to_string(), 100.0);
        state.next_group = Some(1);

        let written = store.write(state.clone()).await.unwrap();
        assert_eq!(written, state);
        assert_eq!(store.read().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        let state = PersistedState {
            next_group: Some(2),
            ..Default::default()
        };
        store.write(state.clone()).await.unwrap();

        assert_eq!(other.read().await.unwrap(), state);
    }
}
