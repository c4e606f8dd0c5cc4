//! Persistence port for ledger snapshots.

use anyhow::Result;

/// Key under which the serialized transaction sequence is stored.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Key under which the selected currency code is stored.
pub const CURRENCY_KEY: &str = "currencyCode";

/// A string key-value store used to save and load snapshots of ledger state.
///
/// Each key is written independently, so a bad value under one key never
/// affects another.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Makes previous writes durable. Stores without a durability layer do nothing.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
