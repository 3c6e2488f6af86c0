pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use anyhow::Result;
use disk::DiskStore;

/// Opens the durable store under the configured data directory.
pub fn open_store(config: &AppConfig) -> Result<DiskStore> {
    let path = config.default_data_path()?.join("store");
    DiskStore::open(&path)
}
