//! Payment outcome policies.
//!
//! No payment gateway is wired in. The outcome of a card submission is
//! decided by a swappable policy; the default declines every attempt.

use crate::card::Network;
use crate::gate::TrackingId;
use crate::payment::Price;
use async_trait::async_trait;

/// What the policy gets to see about a submission. Full card details are
/// never passed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentAttempt {
    /// Identifier being unlocked.
    pub tracking_id: TrackingId,
    /// Amount charged.
    pub price: Price,
    /// Detected card network.
    pub network: Network,
    /// Last four card digits.
    pub last_four_digits: Option<String>,
}

/// Result of a payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment accepted; access is recorded and granted.
    Granted,
    /// Payment refused; nothing is recorded.
    Declined {
        /// Message shown to the user.
        reason: String,
    },
}

/// Decides the outcome of a submitted card form.
#[async_trait]
pub trait OutcomePolicy: Send + Sync {
    /// Decide the outcome of `attempt`.
    async fn decide(&self, attempt: &PaymentAttempt) -> PaymentOutcome;
}

/// Declines every attempt. This is the observed production behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDecline;

/// Message shown for a simulated decline.
pub const SIMULATED_DECLINE_MESSAGE: &str =
    "Payment could not be processed. Your card has not been charged.";

#[async_trait]
impl OutcomePolicy for SimulatedDecline {
    async fn decide(&self, _attempt: &PaymentAttempt) -> PaymentOutcome {
        PaymentOutcome::Declined {
            reason: SIMULATED_DECLINE_MESSAGE.to_string(),
        }
    }
}

/// Grants every attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGrant;

#[async_trait]
impl OutcomePolicy for AlwaysGrant {
    async fn decide(&self, _attempt: &PaymentAttempt) -> PaymentOutcome {
        PaymentOutcome::Granted
    }
}
