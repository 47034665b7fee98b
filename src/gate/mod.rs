//! Access gate workflow.
//!
//! ```text
//! Idle ──submit──▶ Searching ──granted──▶ Authorized ──found──▶ shipment view
//!  ▲                   │  │                    │
//!  │          invalid  │  └─not granted─┐      └─not found─▶ Idle (cache flag revoked)
//!  ├───────────────────┘                ▼
//!  ├──────────cancel────────────── PaymentRequired
//!  │                                    │ valid card
//!  │                                    ▼
//!  └────acknowledge──── Denied ◀──── Processing ──granted──▶ Authorized
//! ```
//!
//! Which way `Processing` goes is decided by an [`OutcomePolicy`]. The
//! default, [`SimulatedDecline`], always denies, so access is in practice
//! only granted to identifiers already unlocked when they are searched.

mod machine;
mod outcome;
mod shipment;
mod state;
mod tracking_id;

pub use machine::{AccessGate, SearchTicket};
pub use outcome::{
    AlwaysGrant, OutcomePolicy, PaymentAttempt, PaymentOutcome, SimulatedDecline,
    SIMULATED_DECLINE_MESSAGE,
};
pub use shipment::{InMemoryShipmentDirectory, ShipmentEvent, ShipmentLookup, ShipmentRecord};
pub use state::{GateAction, GateState};
pub use tracking_id::TrackingId;
