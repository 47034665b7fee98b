//! Test harness wiring a gate to in-memory collaborators.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracking_gate::gate::{OutcomePolicy, ShipmentLookup, ShipmentRecord};
use tracking_gate::payment::ResolverConfig;
use tracking_gate::{
    AccessGate, AccessRecord, AccessStatusStore, CardInput, Error, GateConfig, GateEvent,
    GateEventsChannel, InMemoryAccessStore, InMemoryShipmentDirectory, LocalAccessCache,
    LruAccessCache, PaymentStatusResolver, Result,
};

/// Store that can be told to fail queries, writes, or answer slowly.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryAccessStore,
    fail_queries: AtomicBool,
    fail_writes: AtomicBool,
    slow: AtomicBool,
}

impl FlakyStore {
    /// Make every `exists` call fail.
    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Make every `append` call fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every `exists` call by 50ms.
    pub fn slow(&self, slow: bool) {
        self.slow.store(slow, Ordering::SeqCst);
    }

    /// Records written for `tracking_id`.
    pub fn records_for(&self, tracking_id: &str) -> Vec<AccessRecord> {
        self.inner.records_for(tracking_id)
    }

    /// Total records written.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[async_trait]
impl AccessStatusStore for FlakyStore {
    async fn exists(&self, tracking_id: &str) -> Result<bool> {
        if self.slow.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(Error::Store("connection refused".to_string()));
        }
        self.inner.exists(tracking_id).await
    }

    async fn append(&self, record: AccessRecord) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Store("write rejected".to_string()));
        }
        self.inner.append(record).await
    }
}

/// Shipment lookup whose every call times out.
pub struct UnreachableShipments;

#[async_trait]
impl ShipmentLookup for UnreachableShipments {
    async fn find(&self, _tracking_id: &str) -> Result<Option<ShipmentRecord>> {
        Err(Error::Lookup("timeout".to_string()))
    }
}

/// Gate plus the collaborators behind it.
pub struct TestHarness {
    /// Durable store.
    pub store: Arc<FlakyStore>,
    /// Local cache.
    pub cache: LruAccessCache,
    /// Shipment directory.
    pub shipments: InMemoryShipmentDirectory,
    /// Resolver shared by every gate built from this harness.
    pub resolver: Arc<PaymentStatusResolver>,
    /// Configuration, with a short processing delay.
    pub config: GateConfig,
}

impl TestHarness {
    /// Processing delay used by harness gates.
    pub const PROCESSING_DELAY_MS: u64 = 20;

    /// Fresh collaborators with nothing unlocked and no shipments.
    pub fn setup() -> Self {
        let mut config = GateConfig::default();
        config.gate.processing_delay_ms = Self::PROCESSING_DELAY_MS;

        let store = Arc::new(FlakyStore::default());
        let cache = LruAccessCache::with_capacity(config.cache.capacity);
        let resolver = Arc::new(PaymentStatusResolver::new(
            Arc::clone(&store) as Arc<dyn AccessStatusStore>,
            Arc::new(cache.clone()),
            ResolverConfig::from(&config),
        ));

        Self {
            store,
            cache,
            shipments: InMemoryShipmentDirectory::new(),
            resolver,
            config,
        }
    }

    /// A gate using the default (declining) outcome policy.
    pub fn gate(&self) -> AccessGate {
        AccessGate::new(
            Arc::clone(&self.resolver),
            Arc::new(self.shipments.clone()),
            &self.config,
        )
    }

    /// A gate looking shipments up through `shipments` instead of the
    /// harness directory.
    pub fn gate_over(&self, shipments: Arc<dyn ShipmentLookup>) -> AccessGate {
        AccessGate::new(Arc::clone(&self.resolver), shipments, &self.config)
    }

    /// A gate using `policy` for payment outcomes.
    pub fn gate_with(&self, policy: Arc<dyn OutcomePolicy>) -> AccessGate {
        self.gate().with_outcome_policy(policy)
    }

    /// Register a shipment for `tracking_id`.
    pub fn add_shipment(&self, tracking_id: &str) {
        self.shipments.insert(ShipmentRecord {
            tracking_id: tracking_id.to_string(),
            status: "Delivered".to_string(),
            origin: "Leeds, GB".to_string(),
            destination: "Lyon, FR".to_string(),
            history: Vec::new(),
        });
    }

    /// Mark `tracking_id` unlocked in the local cache only.
    pub async fn unlock_in_cache(&self, tracking_id: &str) {
        self.cache
            .set(tracking_id, true, self.config.cache.ttl_days)
            .await;
    }

    /// Mark `tracking_id` unlocked in the store only.
    #[allow(clippy::expect_used)]
    pub async fn unlock_in_store(&self, tracking_id: &str) {
        self.store
            .append(AccessRecord::new(
                tracking_id,
                self.resolver.price(),
                None,
                None,
            ))
            .await
            .expect("append");
    }
}

/// A card that passes every check, expiring two years from now.
pub fn valid_card() -> CardInput {
    let today = Utc::now().date_naive();
    let expiry = format!("{:02}/{:02}", today.month(), (today.year() + 2) % 100);
    CardInput::new("4111111111111111", &expiry, "123", "JOHN DOE")
}

/// Drain every event currently queued on `events`.
pub fn drain(events: &mut GateEventsChannel) -> Vec<GateEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
