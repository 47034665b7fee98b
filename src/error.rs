//! Error types for tracking-gate.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the access gate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The durable access store failed to answer or accept a write.
    #[error("access store error: {0}")]
    Store(String),

    /// The shipment lookup collaborator failed.
    #[error("shipment lookup error: {0}")]
    Lookup(String),

    /// No shipment exists for a tracking identifier.
    #[error("no shipment found for {0}")]
    ShipmentNotFound(String),

    /// A tracking identifier failed validation.
    #[error("invalid tracking identifier: {0}")]
    InvalidIdentifier(String),

    /// A card form was submitted while one or more fields are invalid.
    #[error("card details are invalid: {0}")]
    InvalidCard(String),

    /// An action is not permitted in the gate's current state.
    #[error("cannot {action} while gate is {state}")]
    InvalidTransition {
        /// State the gate was in.
        state: String,
        /// Action that was attempted.
        action: &'static str,
    },
}
