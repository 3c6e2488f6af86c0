use crate::core::state::{PersistedState, StateStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "state";
const STATE_KEY: &str = "store";

/// State store backed by a fjall keyspace. The whole document lives under a
/// single key as JSON.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION, PartitionCreateOptions::default())
            .context("Failed to open state partition")?;
        debug!("Opened disk store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl StateStore for DiskStore {
    async fn read(&self) -> Result<PersistedState> {
        match self.partition.get(STATE_KEY)? {
            Some(bytes) => {
                let state: PersistedState =
                    serde_json::from_slice(&bytes).context("Corrupt state document")?;
                debug!(rates = state.rates.len(), next_group = ?state.next_group, "Store HIT");
                Ok(state)
            }
            None => {
                debug!("Store MISS, starting from empty document");
                Ok(PersistedState::default())
            }
        }
    }

    async fn write(&self, state: PersistedState) -> Result<PersistedState> {
        let bytes = serde_json::to_vec(&state)?;
        self.partition.insert(STATE_KEY, bytes)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(rates = state.rates.len(), next_group = ?state.next_group, "Store PUT");
        Ok(state)
    }
}
