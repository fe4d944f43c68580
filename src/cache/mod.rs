//! Staleness-aware cache for insurance valuations
//!
//! This module holds the core of the application: a single cached price
//! table with freshness metadata, persisted across restarts. The
//! [`store`] submodule is the durable key-value medium, [`bridge`]
//! mirrors entry mutations into it, and [`controller`] decides when the
//! cached data is still usable and orchestrates refreshes. Expired data
//! is retained and served while a refresh runs in the background.

pub mod bridge;
pub mod controller;
pub mod store;

pub use bridge::PersistenceBridge;
pub use controller::{CacheEntry, CacheStatus, Freshness, PriceCache, PriceView};
pub use store::{FileStore, KeyValueStore, MemoryStore};
