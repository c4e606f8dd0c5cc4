use crate::core::storage::KeyValueStore;
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION_NAME: &str = "ledger";

/// Key-value store persisted in a fjall keyspace on disk.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open keyspace at {}", path.display()))?;
        let partition = keyspace
            .open_partition(PARTITION_NAME, PartitionCreateOptions::default())
            .context("Failed to open ledger partition")?;
        debug!("Opened disk store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self.partition.get(key.as_bytes())? else {
            debug!("Store MISS for key: {:?}", key);
            return Ok(None);
        };
        debug!("Store HIT for key: {:?}", key);
        let value = String::from_utf8(bytes.to_vec())
            .with_context(|| format!("Value for key {key} is not valid UTF-8"))?;
        Ok(Some(value))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.partition.insert(key.as_bytes(), value.as_bytes())?;
        debug!("Store PUT for key: {:?}", key);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist keyspace")?;
        debug!("Store FLUSH");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_disk_store_get_put() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        // Initially, store is empty
        assert!(store.get("key1").unwrap().is_none());

        store.put("key1", "[1,2,3]").unwrap();
        assert_eq!(store.get("key1").unwrap().as_deref(), Some("[1,2,3]"));

        // Get a non-existent key
        assert!(store.get("key2").unwrap().is_none());
    }

    #[test]
    fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.put("currencyCode", "EUR").unwrap();
            store.flush().unwrap();
        }

        let reopened = DiskStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("currencyCode").unwrap().as_deref(),
            Some("EUR")
        );
    }
}
