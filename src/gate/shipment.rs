//! Shipment lookup collaborator.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One scan or status change in a shipment's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentEvent {
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// Where it happened.
    pub location: String,
    /// What happened.
    pub description: String,
}

/// The detailed view revealed once a shipment is unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Tracking identifier.
    pub tracking_id: String,
    /// Current status line.
    pub status: String,
    /// Origin.
    pub origin: String,
    /// Destination.
    pub destination: String,
    /// History, oldest first.
    #[serde(default)]
    pub history: Vec<ShipmentEvent>,
}

/// Finds shipments by tracking identifier.
#[async_trait]
pub trait ShipmentLookup: Send + Sync {
    /// The shipment for `tracking_id`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn find(&self, tracking_id: &str) -> Result<Option<ShipmentRecord>>;
}

/// Process-local [`ShipmentLookup`].
#[derive(Clone, Default)]
pub struct InMemoryShipmentDirectory {
    shipments: Arc<RwLock<HashMap<String, ShipmentRecord>>>,
}

impl InMemoryShipmentDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a shipment, keyed by its tracking identifier.
    pub fn insert(&self, shipment: ShipmentRecord) {
        self.shipments
            .write()
            .insert(shipment.tracking_id.clone(), shipment);
    }
}

#[async_trait]
impl ShipmentLookup for InMemoryShipmentDirectory {
    async fn find(&self, tracking_id: &str) -> Result<Option<ShipmentRecord>> {
        Ok(self.shipments.read().get(tracking_id).cloned())
    }
}
