//! Change-persistence bridge between the cache entry and the store
//!
//! Every mutation of the cached entry is mirrored to the durable store
//! here, synchronously, before the controller acknowledges it. The bridge
//! owns the serialization format: the value and the freshness metadata are
//! written under their own stable keys, one write per key per mutation.
//! Loading is defensive — a missing or malformed blob is identical to "no
//! cached value".

use super::controller::{CacheEntry, Freshness};
use super::store::KeyValueStore;
use crate::data::InsurancePrices;

/// Store key for the serialized price table
const VALUE_KEY: &str = "insurance_prices";

/// Store key for the serialized freshness metadata
const META_KEY: &str = "insurance_prices_meta";

/// Mirrors cache entry mutations into a [`KeyValueStore`]
#[derive(Debug)]
pub struct PersistenceBridge<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PersistenceBridge<S> {
    /// Creates a bridge writing through to the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Writes a snapshot of the entry's value and metadata to the store
    ///
    /// Called by the controller after each entry mutation. A failed write
    /// leaves the in-memory entry authoritative for the session; the next
    /// successful mutation rewrites both keys.
    pub fn persist(&self, entry: &CacheEntry) -> std::io::Result<()> {
        let meta_blob = serde_json::to_string(&entry.freshness)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if let Some(ref value) = entry.value {
            let value_blob = serde_json::to_string(value)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            self.store.set(VALUE_KEY, &value_blob)?;
        }
        self.store.set(META_KEY, &meta_blob)
    }

    /// Loads the persisted entry, defaulting anything missing or malformed
    ///
    /// The freshness interval always comes from `interval_ms`, never from
    /// disk. A metadata blob without a value blob is reset to
    /// never-fetched so a restart cannot report fresh data it does not
    /// have.
    pub fn load(&self, interval_ms: i64) -> CacheEntry {
        let value: Option<InsurancePrices> = self
            .store
            .get(VALUE_KEY)
            .and_then(|blob| serde_json::from_str(&blob).ok());

        let mut freshness = self
            .store
            .get(META_KEY)
            .and_then(|blob| serde_json::from_str::<Freshness>(&blob).ok())
            .map(|persisted| Freshness::restored(persisted.last_updated_ms, interval_ms))
            .unwrap_or_else(|| Freshness::never(interval_ms));

        if value.is_none() {
            freshness = Freshness::never(interval_ms);
        }

        CacheEntry { value, freshness }
    }

    /// Removes every persisted blob
    pub fn clear(&self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::{FileStore, MemoryStore};
    use crate::data::{CoverageTier, HullQuote, InsurancePrices};
    use tempfile::TempDir;

    const HOUR_MS: i64 = 3_600_000;

    fn sample_prices() -> InsurancePrices {
        let mut prices = InsurancePrices::default();
        prices.hulls.insert(
            582,
            HullQuote {
                hull_name: "Bantam".to_string(),
                tiers: vec![CoverageTier {
                    level: "Basic".to_string(),
                    cost: 12_000.0,
                    payout: 40_000.0,
                }],
            },
        );
        prices
    }

    fn populated_entry(last_updated_ms: i64) -> CacheEntry {
        CacheEntry {
            value: Some(sample_prices()),
            freshness: Freshness::restored(last_updated_ms, HOUR_MS),
        }
    }

    #[test]
    fn test_persist_writes_both_keys() {
        let bridge = PersistenceBridge::new(MemoryStore::new());
        let entry = populated_entry(1_000);

        bridge.persist(&entry).expect("Persist should succeed");

        assert!(bridge.store.get("insurance_prices").is_some());
        assert!(bridge.store.get("insurance_prices_meta").is_some());
    }

    #[test]
    fn test_load_roundtrips_entry() {
        let bridge = PersistenceBridge::new(MemoryStore::new());
        let entry = populated_entry(42_000);

        bridge.persist(&entry).expect("Persist should succeed");
        let loaded = bridge.load(HOUR_MS);

        assert_eq!(loaded, entry);
    }

    #[test]
    fn test_load_empty_store_defaults_to_never_fetched() {
        let bridge = PersistenceBridge::new(MemoryStore::new());

        let entry = bridge.load(HOUR_MS);

        assert!(entry.value.is_none());
        assert_eq!(entry.freshness.last_updated_ms, 0);
        assert_eq!(entry.freshness.interval_ms, HOUR_MS);
    }

    #[test]
    fn test_load_malformed_value_blob_is_cache_miss() {
        let store = MemoryStore::new();
        store.set("insurance_prices", "{ not json").expect("Set should succeed");
        store
            .set("insurance_prices_meta", "{\"last_updated_ms\":5000,\"interval_ms\":3600000}")
            .expect("Set should succeed");

        let bridge = PersistenceBridge::new(store);
        let entry = bridge.load(HOUR_MS);

        assert!(entry.value.is_none());
        assert_eq!(
            entry.freshness.last_updated_ms, 0,
            "A value-less entry must read as never fetched"
        );
    }

    #[test]
    fn test_load_malformed_meta_blob_defaults_metadata() {
        let store = MemoryStore::new();
        let value_blob = serde_json::to_string(&sample_prices()).unwrap();
        store.set("insurance_prices", &value_blob).expect("Set should succeed");
        store.set("insurance_prices_meta", "garbage").expect("Set should succeed");

        let bridge = PersistenceBridge::new(store);
        let entry = bridge.load(HOUR_MS);

        assert!(entry.value.is_some(), "Value blob alone should still load");
        assert_eq!(entry.freshness.last_updated_ms, 0);
    }

    #[test]
    fn test_load_ignores_persisted_interval() {
        let bridge = PersistenceBridge::new(MemoryStore::new());
        let entry = CacheEntry {
            value: Some(sample_prices()),
            freshness: Freshness::restored(9_000, 60_000),
        };
        bridge.persist(&entry).expect("Persist should succeed");

        let loaded = bridge.load(HOUR_MS);

        assert_eq!(loaded.freshness.interval_ms, HOUR_MS);
        assert_eq!(loaded.freshness.last_updated_ms, 9_000);
    }

    #[test]
    fn test_clear_removes_persisted_entry() {
        let bridge = PersistenceBridge::new(MemoryStore::new());
        bridge.persist(&populated_entry(1_000)).expect("Persist should succeed");

        bridge.clear();

        let entry = bridge.load(HOUR_MS);
        assert!(entry.value.is_none());
        assert_eq!(entry.freshness.last_updated_ms, 0);
    }

    #[test]
    fn test_persist_survives_process_restart_via_file_store() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        {
            let bridge = PersistenceBridge::new(FileStore::with_dir(temp_dir.path().to_path_buf()));
            bridge.persist(&populated_entry(77_000)).expect("Persist should succeed");
        }

        // A fresh bridge over the same directory simulates a restart
        let bridge = PersistenceBridge::new(FileStore::with_dir(temp_dir.path().to_path_buf()));
        let entry = bridge.load(HOUR_MS);

        assert_eq!(entry, populated_entry(77_000));
    }
}
