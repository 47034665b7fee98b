//! Durable record of unlocked tracking identifiers.

use crate::card::Network;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An amount in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (pence, cents).
    pub amount_minor: u64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl Price {
    /// Create a price.
    #[must_use]
    pub fn new(amount_minor: u64, currency: &str) -> Self {
        Self {
            amount_minor,
            currency: currency.to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount_minor / 100,
            self.amount_minor % 100,
            self.currency
        )
    }
}

/// A fact that a tracking identifier has been unlocked.
///
/// Records are append-only. Several records may exist for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    /// Identifier that was unlocked.
    pub tracking_identifier: String,
    /// Amount paid, in minor units.
    pub amount: u64,
    /// Currency of `amount`.
    pub currency: String,
    /// When the record was written.
    pub payment_date: DateTime<Utc>,
    /// Card network used, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<Network>,
    /// Last four card digits, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_four_digits: Option<String>,
}

impl AccessRecord {
    /// A record dated now.
    #[must_use]
    pub fn new(
        tracking_identifier: &str,
        price: &Price,
        network: Option<Network>,
        last_four_digits: Option<String>,
    ) -> Self {
        Self {
            tracking_identifier: tracking_identifier.to_string(),
            amount: price.amount_minor,
            currency: price.currency.clone(),
            payment_date: Utc::now(),
            network,
            last_four_digits,
        }
    }
}

/// Durable key-value record of "identifier has unlocked" facts.
#[async_trait]
pub trait AccessStatusStore: Send + Sync {
    /// Whether any record exists for `tracking_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn exists(&self, tracking_id: &str) -> Result<bool>;

    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write is not accepted.
    async fn append(&self, record: AccessRecord) -> Result<()>;
}

/// Process-local [`AccessStatusStore`].
#[derive(Clone, Default)]
pub struct InMemoryAccessStore {
    records: Arc<RwLock<Vec<AccessRecord>>>,
}

impl InMemoryAccessStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All records written for `tracking_id`, oldest first.
    #[must_use]
    pub fn records_for(&self, tracking_id: &str) -> Vec<AccessRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.tracking_identifier == tracking_id)
            .cloned()
            .collect()
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl AccessStatusStore for InMemoryAccessStore {
    async fn exists(&self, tracking_id: &str) -> Result<bool> {
        Ok(self
            .records
            .read()
            .iter()
            .any(|r| r.tracking_identifier == tracking_id))
    }

    async fn append(&self, record: AccessRecord) -> Result<()> {
        self.records.write().push(record);
        Ok(())
    }
}
