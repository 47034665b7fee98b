//! Payment-gated premium shipment tracking.
//!
//! The detailed history of a shipment is only revealed once the requester
//! has unlocked it. This crate holds the three pieces that decide that:
//!
//! - [`card`]: pure card-input validation and display formatting
//! - [`payment`]: the dual-source access resolver (durable store + local cache)
//! - [`gate`]: the access gate state machine driving the whole flow
//!
//! ```text
//! tracking id ──▶ Searching ──resolve()──┬── granted ──▶ Authorized ──▶ shipment view
//!                                        └── missing ──▶ PaymentRequired ──▶ Processing ──▶ Denied
//! ```

pub mod card;
pub mod config;
pub mod error;
pub mod event;
pub mod gate;
pub mod payment;

pub use card::{CardForm, CardInput, Network, ValidationErrors};
pub use config::GateConfig;
pub use error::{Error, Result};
pub use event::{create_event_channel, GateEvent, GateEventsChannel, GateEventsSender, NoticeLevel};
pub use gate::{
    AccessGate, AlwaysGrant, GateState, InMemoryShipmentDirectory, OutcomePolicy, PaymentOutcome,
    SearchTicket, ShipmentLookup, ShipmentRecord, SimulatedDecline, TrackingId,
};
pub use payment::{
    AccessRecord, AccessStatus, AccessStatusStore, InMemoryAccessStore, LocalAccessCache,
    LruAccessCache, PaymentStatusResolver, Price,
};
