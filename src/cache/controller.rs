//! TTL cache controller for the insurance price table
//!
//! Owns the single cached entry and its freshness metadata, decides
//! whether cached data is still usable, and orchestrates refreshes with an
//! at-most-one-in-flight guarantee. Expired data is never discarded: a
//! failed refresh retains the last-known-good value and the cache simply
//! becomes eligible for another attempt on the next staleness check
//! (stale-while-revalidate).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::bridge::PersistenceBridge;
use super::store::KeyValueStore;
use crate::data::{InsurancePrices, PriceSource};

/// Default freshness window: one hour
pub const DEFAULT_INTERVAL_MS: i64 = 3_600_000;

/// Freshness metadata for the cached price table
///
/// `last_updated_ms` is milliseconds since the Unix epoch of the last
/// successful fetch; `0` means never fetched and is stale for any positive
/// interval. The interval is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freshness {
    /// Timestamp of the last successful fetch (ms since epoch, 0 = never)
    pub last_updated_ms: i64,
    /// Width of the freshness window in milliseconds
    pub interval_ms: i64,
}

impl Freshness {
    /// Metadata for a never-fetched entry
    ///
    /// `interval` must be a positive duration.
    pub fn never(interval_ms: i64) -> Self {
        assert!(interval_ms > 0, "freshness interval must be positive");
        Self {
            last_updated_ms: 0,
            interval_ms,
        }
    }

    /// Metadata rehydrated from a persisted timestamp
    pub fn restored(last_updated_ms: i64, interval_ms: i64) -> Self {
        let mut freshness = Self::never(interval_ms);
        freshness.last_updated_ms = last_updated_ms;
        freshness
    }

    /// Whether the window has lapsed at the given instant
    pub fn is_stale(&self, now_ms: i64) -> bool {
        now_ms > self.last_updated_ms + self.interval_ms
    }

    /// The last successful fetch as a UTC timestamp, if any
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        if self.last_updated_ms == 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.last_updated_ms).single()
    }
}

/// The cached value together with its freshness metadata
///
/// Exclusively owned by [`PriceCache`]; everything else sees read
/// references. `value` is `None` only before the first successful fetch
/// ever.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Last successfully fetched price table
    pub value: Option<InsurancePrices>,
    /// When it was fetched and how long it stays fresh
    pub freshness: Freshness,
}

/// Observable cache state at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// A value exists and the window has not lapsed
    Fresh,
    /// Stale (or never fetched) and no refresh is running
    StalePending,
    /// A refresh is in flight; readers keep seeing the old value
    Refreshing,
    /// The last refresh failed; the previous value is retained
    FailedRetained,
}

/// Read-only view of the cache for consumer code
///
/// Never blocks and never triggers a fetch; refreshing is solely the
/// controller's job.
#[derive(Debug, Clone, Copy)]
pub struct PriceView<'a> {
    entry: &'a CacheEntry,
}

impl<'a> PriceView<'a> {
    /// The last-known price table, regardless of freshness
    pub fn value(&self) -> Option<&'a InsurancePrices> {
        self.entry.value.as_ref()
    }

    /// True once any successful fetch has ever completed
    pub fn is_usable(&self) -> bool {
        self.entry.value.is_some()
    }
}

/// Controller owning the cached price table
///
/// Refreshes follow a begin/complete protocol so the network call can run
/// on a detached task: [`PriceCache::begin_refresh`] claims the single
/// in-flight slot, and [`PriceCache::complete_refresh`] /
/// [`PriceCache::fail_refresh`] apply the outcome. Value and timestamp
/// update together as one mutation, which the bridge persists before the
/// mutation is acknowledged.
#[derive(Debug)]
pub struct PriceCache<S: KeyValueStore> {
    entry: CacheEntry,
    bridge: PersistenceBridge<S>,
    refresh_in_flight: bool,
    last_refresh_failed: bool,
}

impl<S: KeyValueStore> PriceCache<S> {
    /// Creates an uninitialized cache over the given bridge
    ///
    /// `interval` must be a positive duration. Call
    /// [`PriceCache::initialize`] before first use.
    pub fn new(bridge: PersistenceBridge<S>, interval: Duration) -> Self {
        Self {
            entry: CacheEntry {
                value: None,
                freshness: Freshness::never(interval.as_millis() as i64),
            },
            bridge,
            refresh_in_flight: false,
            last_refresh_failed: false,
        }
    }

    /// Loads the persisted entry, or defaults it to never-fetched
    ///
    /// Whether a refresh is then needed is the caller's decision via
    /// [`PriceCache::needs_refresh`]; this keeps loading synchronous and
    /// side-effect free.
    pub fn initialize(&mut self) {
        self.entry = self.bridge.load(self.entry.freshness.interval_ms);
    }

    /// Whether the cached value is still within its freshness window
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        !self.entry.freshness.is_stale(now_ms)
    }

    /// Whether a refresh should be started now
    ///
    /// True when the entry is stale and no refresh is already running.
    pub fn needs_refresh(&self, now_ms: i64) -> bool {
        self.entry.freshness.is_stale(now_ms) && !self.refresh_in_flight
    }

    /// Claims the single in-flight refresh slot
    ///
    /// Returns false when a refresh is already running; the caller must
    /// then drop its request rather than queue it.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refresh_in_flight {
            return false;
        }
        self.refresh_in_flight = true;
        self.last_refresh_failed = false;
        true
    }

    /// Applies a successful refresh
    ///
    /// The value and `last_updated_ms` mutate together as one transition,
    /// then the bridge persists the snapshot before the mutation is
    /// acknowledged. An empty price table is still a success.
    pub fn complete_refresh(&mut self, prices: InsurancePrices) {
        self.entry.value = Some(prices);
        self.entry.freshness.last_updated_ms = Utc::now().timestamp_millis();
        let _ = self.bridge.persist(&self.entry);
        self.refresh_in_flight = false;
        self.last_refresh_failed = false;
    }

    /// Applies a failed refresh
    ///
    /// Value and metadata are left untouched; the old value, if any,
    /// remains the last-known-good answer. No retry is scheduled here —
    /// the next staleness check may start another attempt.
    pub fn fail_refresh(&mut self) {
        self.refresh_in_flight = false;
        self.last_refresh_failed = true;
    }

    /// Runs one full refresh against the given source
    ///
    /// No-op when a refresh is already in flight. Rejection reasons are
    /// not interpreted; any error is a uniform refresh failure.
    pub async fn refresh_with<P: PriceSource>(&mut self, source: &P) {
        if !self.begin_refresh() {
            return;
        }
        match source.fetch().await {
            Ok(prices) => self.complete_refresh(prices),
            Err(_) => self.fail_refresh(),
        }
    }

    /// The last-known price table, immediately, regardless of state
    pub fn current_value(&self) -> Option<&InsurancePrices> {
        self.entry.value.as_ref()
    }

    /// Read-only accessor for consumer code
    pub fn view(&self) -> PriceView<'_> {
        PriceView { entry: &self.entry }
    }

    /// Whether a refresh is currently in flight
    pub fn refresh_in_flight(&self) -> bool {
        self.refresh_in_flight
    }

    /// Freshness metadata of the current entry
    pub fn freshness(&self) -> Freshness {
        self.entry.freshness
    }

    /// Observable state at the given instant
    pub fn status(&self, now_ms: i64) -> CacheStatus {
        if self.refresh_in_flight {
            CacheStatus::Refreshing
        } else if self.last_refresh_failed {
            CacheStatus::FailedRetained
        } else if self.entry.freshness.is_stale(now_ms) {
            CacheStatus::StalePending
        } else {
            CacheStatus::Fresh
        }
    }
}
