//! Gate states and the transition table.

use std::fmt;

/// Where a tracking request currently is in the access workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GateState {
    /// Waiting for a tracking identifier.
    #[default]
    Idle,
    /// Resolving whether the identifier is unlocked.
    Searching,
    /// Locked; the card form is shown.
    PaymentRequired,
    /// A card submission is being processed.
    Processing,
    /// Unlocked; the shipment view may be shown.
    Authorized,
    /// The payment attempt failed.
    Denied,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::PaymentRequired => "payment-required",
            Self::Processing => "processing",
            Self::Authorized => "authorized",
            Self::Denied => "denied",
        };
        f.write_str(name)
    }
}

/// Inputs that move the gate between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// A tracking identifier was submitted. Supersedes any current flow.
    SubmitIdentifier,
    /// Access resolution finished.
    Resolved {
        /// Whether access was granted.
        granted: bool,
    },
    /// The identifier was rejected before resolution.
    SearchFailed,
    /// The user cancelled at the card form.
    Cancel,
    /// A valid card form was submitted.
    SubmitCard,
    /// The payment outcome arrived.
    Outcome {
        /// Whether the outcome grants access.
        granted: bool,
    },
    /// The user acknowledged a denial.
    Acknowledge,
    /// The shipment lookup found nothing or failed.
    LookupFailed,
    /// The flow was torn down.
    Dismiss,
}

impl GateAction {
    /// Short name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SubmitIdentifier => "submit identifier",
            Self::Resolved { .. } => "apply resolution",
            Self::SearchFailed => "fail search",
            Self::Cancel => "cancel",
            Self::SubmitCard => "submit card",
            Self::Outcome { .. } => "apply payment outcome",
            Self::Acknowledge => "acknowledge",
            Self::LookupFailed => "fail lookup",
            Self::Dismiss => "dismiss",
        }
    }
}

impl GateState {
    /// The state reached by applying `action`, or `None` if it is not allowed.
    #[must_use]
    pub const fn next(self, action: GateAction) -> Option<Self> {
        use GateAction as A;
        use GateState as S;

        match (self, action) {
            (_, A::SubmitIdentifier) => Some(S::Searching),
            (_, A::Dismiss) => Some(S::Idle),
            (S::Searching, A::Resolved { granted: true }) => Some(S::Authorized),
            (S::Searching, A::Resolved { granted: false }) => Some(S::PaymentRequired),
            (S::Searching, A::SearchFailed) => Some(S::Idle),
            (S::PaymentRequired, A::Cancel) => Some(S::Idle),
            (S::PaymentRequired, A::SubmitCard) => Some(S::Processing),
            (S::Processing, A::Outcome { granted: true }) => Some(S::Authorized),
            (S::Processing, A::Outcome { granted: false }) => Some(S::Denied),
            (S::Denied, A::Acknowledge) => Some(S::Idle),
            (S::Authorized, A::LookupFailed) => Some(S::Idle),
            _ => None,
        }
    }
}
