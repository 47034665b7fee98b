//! Access resolver reconciling the durable store with the local cache.
//!
//! This is the core access decision for tracking-gate.

use crate::card::Network;
use crate::config::GateConfig;
use crate::payment::cache::LocalAccessCache;
use crate::payment::store::{AccessRecord, AccessStatusStore, Price};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for the resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Price written on reconciled records.
    pub price: Price,
    /// Lifetime of cache flags written by [`PaymentStatusResolver::record`].
    pub cache_ttl_days: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from(&GateConfig::default())
    }
}

impl From<&GateConfig> for ResolverConfig {
    fn from(config: &GateConfig) -> Self {
        Self {
            price: config.pricing.price(),
            cache_ttl_days: config.cache.ttl_days,
        }
    }
}

/// What the durable store said about an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAnswer {
    /// At least one record exists.
    Found,
    /// No record exists.
    Missing,
    /// The store could not be queried.
    Unavailable,
}

/// Outcome of resolving an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    /// The store holds a record.
    StoreConfirmed,
    /// The store had no record but the cache did; the store must be updated.
    CacheReconciled,
    /// The store was unreachable and the cache says unlocked.
    CacheFallback,
    /// Neither source shows the identifier as unlocked.
    PaymentRequired,
}

impl AccessStatus {
    /// Returns true if the detailed view may be shown.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        !matches!(self, Self::PaymentRequired)
    }

    /// Returns true if a record must be appended to bring the store in line
    /// with the cache.
    #[must_use]
    pub const fn needs_reconciliation(self) -> bool {
        matches!(self, Self::CacheReconciled)
    }
}

/// Precedence policy between the two sources.
///
/// The store wins. The cache is consulted only when the store has nothing
/// to say, and only an explicit unlocked flag counts.
pub struct AccessPolicy;

impl AccessPolicy {
    /// Combine a store answer and a cache hint into one status.
    #[must_use]
    pub const fn decide(store: StoreAnswer, cache_hint: Option<bool>) -> AccessStatus {
        match (store, cache_hint) {
            (StoreAnswer::Found, _) => AccessStatus::StoreConfirmed,
            (StoreAnswer::Missing, Some(true)) => AccessStatus::CacheReconciled,
            (StoreAnswer::Unavailable, Some(true)) => AccessStatus::CacheFallback,
            (StoreAnswer::Missing | StoreAnswer::Unavailable, _) => AccessStatus::PaymentRequired,
        }
    }
}

/// Resolver statistics.
///
/// `write_failures` above zero means the cache and store may have diverged.
#[derive(Debug, Default, Clone)]
pub struct ResolverStats {
    /// Resolutions answered by the store.
    pub store_hits: u64,
    /// Resolutions granted on the cache's word.
    pub cache_hits: u64,
    /// Records appended to reconcile the store with the cache.
    pub reconciliations: u64,
    /// Records appended through [`PaymentStatusResolver::record`].
    pub records: u64,
    /// Store queries that failed.
    pub query_failures: u64,
    /// Store writes that failed.
    pub write_failures: u64,
    /// Cache flags revoked.
    pub revocations: u64,
}

/// Decides whether a tracking identifier is unlocked.
///
/// Combines:
/// 1. The durable access store (authoritative)
/// 2. The local access cache (hint, synced one way into the store)
pub struct PaymentStatusResolver {
    store: Arc<dyn AccessStatusStore>,
    cache: Arc<dyn LocalAccessCache>,
    config: ResolverConfig,
    stats: Mutex<ResolverStats>,
}

impl PaymentStatusResolver {
    /// Create a resolver over the given store and cache.
    #[must_use]
    pub fn new(
        store: Arc<dyn AccessStatusStore>,
        cache: Arc<dyn LocalAccessCache>,
        config: ResolverConfig,
    ) -> Self {
        info!(
            "Access resolver initialized (price={}, cache_ttl_days={})",
            config.price, config.cache_ttl_days
        );
        Self {
            store,
            cache,
            config,
            stats: Mutex::new(ResolverStats::default()),
        }
    }

    /// Whether `tracking_id` is unlocked.
    ///
    /// Never fails: a store fault degrades to the cache value alone.
    pub async fn resolve(&self, tracking_id: &str) -> bool {
        self.resolve_status(tracking_id).await.is_granted()
    }

    /// Resolve `tracking_id` and report which source decided it.
    ///
    /// A cache-only unlock is written back to the store before this returns.
    pub async fn resolve_status(&self, tracking_id: &str) -> AccessStatus {
        let answer = match self.store.exists(tracking_id).await {
            Ok(true) => StoreAnswer::Found,
            Ok(false) => StoreAnswer::Missing,
            Err(e) => {
                warn!("Access store query failed for {}: {}", tracking_id, e);
                self.stats.lock().query_failures += 1;
                StoreAnswer::Unavailable
            }
        };

        let cache_hint = if answer == StoreAnswer::Found {
            None
        } else {
            self.cache.get(tracking_id).await
        };

        let status = AccessPolicy::decide(answer, cache_hint);
        debug!(
            "Resolved {}: store={:?} cache={:?} -> {:?}",
            tracking_id, answer, cache_hint, status
        );

        match status {
            AccessStatus::StoreConfirmed => self.stats.lock().store_hits += 1,
            AccessStatus::CacheReconciled | AccessStatus::CacheFallback => {
                self.stats.lock().cache_hits += 1;
            }
            AccessStatus::PaymentRequired => {}
        }

        if status.needs_reconciliation() {
            let record = AccessRecord::new(tracking_id, &self.config.price, None, None);
            if self.append_logged(record).await {
                info!("Reconciled cached unlock for {} into access store", tracking_id);
                self.stats.lock().reconciliations += 1;
            }
        }

        status
    }

    /// Record that `tracking_id` has been paid for.
    ///
    /// Appends a record (duplicates are kept) and refreshes the cache flag.
    /// A failed store write is logged and counted, never returned.
    pub async fn record(
        &self,
        tracking_id: &str,
        price: &Price,
        network: Option<Network>,
        last_four_digits: Option<String>,
    ) {
        let record = AccessRecord::new(tracking_id, price, network, last_four_digits);
        if self.append_logged(record).await {
            info!("Recorded access for {} ({})", tracking_id, price);
            self.stats.lock().records += 1;
        }
        self.cache
            .set(tracking_id, true, self.config.cache_ttl_days)
            .await;
    }

    /// Drop any cached unlock flag for `tracking_id`.
    ///
    /// Store records are left untouched.
    pub async fn revoke(&self, tracking_id: &str) {
        self.cache.remove(tracking_id).await;
        self.stats.lock().revocations += 1;
        debug!("Revoked cached access for {}", tracking_id);
    }

    async fn append_logged(&self, record: AccessRecord) -> bool {
        let tracking_id = record.tracking_identifier.clone();
        match self.store.append(record).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Access store write failed for {}; cache and store may diverge: {}",
                    tracking_id, e
                );
                self.stats.lock().write_failures += 1;
                false
            }
        }
    }

    /// Canonical unlock price.
    #[must_use]
    pub fn price(&self) -> &Price {
        &self.config.price
    }

    /// Get resolver statistics.
    #[must_use]
    pub fn stats(&self) -> ResolverStats {
        self.stats.lock().clone()
    }
}
