pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::storage::KeyValueStore;
use anyhow::Result;
use disk::DiskStore;
use std::sync::Arc;
use tracing::debug;

/// Opens the on-disk store under the configured data directory.
pub fn open_default(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    let path = config.default_data_path()?.join("ledger");
    debug!("Opening ledger store at {}", path.display());
    Ok(Arc::new(DiskStore::open(&path)?))
}
