//! Gate event system.
//!
//! Transient notices and state changes are broadcast to whoever renders the
//! flow. Sends are fire-and-forget: nothing in the gate waits on a listener.

use crate::gate::GateState;
use tokio::sync::broadcast;

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Something completed successfully.
    Success,
    /// Informational message (e.g. a cancelled payment).
    Info,
    /// Something went wrong.
    Error,
}

/// Events emitted by the access gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    /// The gate moved from one state to another.
    StateChanged {
        /// Previous state.
        from: GateState,
        /// New state.
        to: GateState,
    },

    /// A transient message for the user.
    Notice {
        /// Severity.
        level: NoticeLevel,
        /// Human-readable message.
        message: String,
    },
}

/// Channel for receiving gate events.
pub type GateEventsChannel = broadcast::Receiver<GateEvent>;

/// Sender for gate events.
pub type GateEventsSender = broadcast::Sender<GateEvent>;

/// Create a new event channel pair.
#[must_use]
pub fn create_event_channel() -> (GateEventsSender, GateEventsChannel) {
    broadcast::channel(256)
}
