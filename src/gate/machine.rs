//! The access gate: one instance per tracking flow.

use crate::card::{CardField, CardForm, CardInput, ValidationErrors};
use crate::config::GateConfig;
use crate::error::{Error, Result};
use crate::event::{create_event_channel, GateEvent, GateEventsChannel, GateEventsSender, NoticeLevel};
use crate::gate::outcome::{OutcomePolicy, PaymentAttempt, PaymentOutcome, SimulatedDecline};
use crate::gate::shipment::{ShipmentLookup, ShipmentRecord};
use crate::gate::state::{GateAction, GateState};
use crate::gate::TrackingId;
use crate::payment::{PaymentStatusResolver, Price};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handle for one in-flight resolution.
///
/// A ticket only applies while no newer submission, cancel or dismiss has
/// happened on the gate that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    tracking_id: TrackingId,
}

impl SearchTicket {
    /// Identifier being resolved.
    #[must_use]
    pub fn tracking_id(&self) -> &TrackingId {
        &self.tracking_id
    }
}

/// Drives a tracking request from identifier entry to either the unlocked
/// shipment view or a payment denial.
pub struct AccessGate {
    resolver: Arc<PaymentStatusResolver>,
    shipments: Arc<dyn ShipmentLookup>,
    outcome: Arc<dyn OutcomePolicy>,
    events_tx: GateEventsSender,
    price: Price,
    processing_delay: Duration,

    state: GateState,
    generation: u64,
    tracking_id: Option<TrackingId>,
    form: CardForm,
    shipment: Option<ShipmentRecord>,
}

impl AccessGate {
    /// Create a gate in [`GateState::Idle`] that declines every payment.
    #[must_use]
    pub fn new(
        resolver: Arc<PaymentStatusResolver>,
        shipments: Arc<dyn ShipmentLookup>,
        config: &GateConfig,
    ) -> Self {
        let (events_tx, _) = create_event_channel();
        Self {
            resolver,
            shipments,
            outcome: Arc::new(SimulatedDecline),
            events_tx,
            price: config.pricing.price(),
            processing_delay: config.gate.processing_delay(),
            state: GateState::Idle,
            generation: 0,
            tracking_id: None,
            form: CardForm::new(),
            shipment: None,
        }
    }

    /// Replace the payment outcome policy.
    #[must_use]
    pub fn with_outcome_policy(mut self, outcome: Arc<dyn OutcomePolicy>) -> Self {
        self.outcome = outcome;
        self
    }

    /// Subscribe to gate events.
    #[must_use]
    pub fn subscribe(&self) -> GateEventsChannel {
        self.events_tx.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Identifier of the current flow, if any.
    #[must_use]
    pub fn tracking_id(&self) -> Option<&TrackingId> {
        self.tracking_id.as_ref()
    }

    /// The unlocked shipment view, once revealed.
    #[must_use]
    pub fn shipment(&self) -> Option<&ShipmentRecord> {
        self.shipment.as_ref()
    }

    /// The card form.
    #[must_use]
    pub fn form(&self) -> &CardForm {
        &self.form
    }

    /// Price charged to unlock.
    #[must_use]
    pub fn price(&self) -> &Price {
        &self.price
    }

    /// Submit a tracking identifier and run the flow up to either the
    /// shipment view or the card form.
    ///
    /// # Errors
    ///
    /// Returns an error (with the gate back in [`GateState::Idle`]) if the
    /// identifier is invalid, no shipment exists for it, or the shipment
    /// lookup fails.
    pub async fn submit_identifier(&mut self, raw: &str) -> Result<GateState> {
        let ticket = self.begin_search(raw)?;
        let granted = self.resolver.resolve(ticket.tracking_id.as_str()).await;
        self.apply_resolution(&ticket, granted)?;

        if self.state == GateState::Authorized {
            self.reveal().await?;
        }
        Ok(self.state)
    }

    /// Start a new flow for `raw`, superseding whatever was in progress.
    ///
    /// The caller resolves access for the ticket's identifier and hands the
    /// answer to [`AccessGate::apply_resolution`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] (gate back in `Idle`) if `raw`
    /// does not parse.
    pub fn begin_search(&mut self, raw: &str) -> Result<SearchTicket> {
        self.reset_flow();
        self.transition(GateAction::SubmitIdentifier)?;

        let tracking_id = match TrackingId::parse(raw) {
            Ok(id) => id,
            Err(e) => {
                self.transition(GateAction::SearchFailed)?;
                self.notify(NoticeLevel::Error, e.to_string());
                return Err(e);
            }
        };

        debug!("Searching access for {}", tracking_id);
        self.tracking_id = Some(tracking_id.clone());
        Ok(SearchTicket {
            generation: self.generation,
            tracking_id,
        })
    }

    /// Apply a resolution for `ticket`.
    ///
    /// Returns `Ok(false)` and changes nothing if the ticket is stale.
    ///
    /// # Errors
    ///
    /// Returns an error only if the state table rejects the transition.
    pub fn apply_resolution(&mut self, ticket: &SearchTicket, granted: bool) -> Result<bool> {
        if ticket.generation != self.generation || self.state != GateState::Searching {
            debug!(
                "Discarding stale resolution for {} (ticket generation {}, current {})",
                ticket.tracking_id, ticket.generation, self.generation
            );
            return Ok(false);
        }

        self.transition(GateAction::Resolved { granted })?;
        if !granted {
            info!(
                "Payment of {} required to unlock {}",
                self.price, ticket.tracking_id
            );
        }
        Ok(true)
    }

    /// Update one card field. Only allowed while payment is required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] outside `PaymentRequired`.
    pub fn update_card(&mut self, field: CardField, raw: &str) -> Result<&ValidationErrors> {
        self.expect_state(GateState::PaymentRequired, "edit card details")?;
        Ok(self.form.update(field, raw))
    }

    /// Replace the whole card form. Only allowed while payment is required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] outside `PaymentRequired`.
    pub fn fill_card(&mut self, input: CardInput) -> Result<&ValidationErrors> {
        self.expect_state(GateState::PaymentRequired, "edit card details")?;
        Ok(self.form.fill(input))
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit_payment(&self) -> bool {
        self.state == GateState::PaymentRequired && self.form.can_submit()
    }

    /// Abandon payment and return to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] outside `PaymentRequired`.
    pub fn cancel(&mut self) -> Result<()> {
        self.transition(GateAction::Cancel)?;
        self.reset_flow();
        self.notify(
            NoticeLevel::Info,
            "Payment cancelled. Detailed tracking remains locked.".to_string(),
        );
        Ok(())
    }

    /// Submit the card form, wait out the processing delay and apply the
    /// outcome policy's decision.
    ///
    /// A declined attempt records nothing. A granted one records access and
    /// reveals the shipment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCard`] (still in `PaymentRequired`) if the form
    /// does not validate, [`Error::InvalidTransition`] outside
    /// `PaymentRequired`, and lookup errors after a grant.
    pub async fn submit_payment(&mut self) -> Result<GateState> {
        self.expect_state(GateState::PaymentRequired, "submit card")?;
        let tracking_id = self.current_tracking_id()?;

        if !self.form.revalidate() {
            return Err(Error::InvalidCard(self.form.errors().to_string()));
        }

        let input = self.form.input();
        let attempt = PaymentAttempt {
            tracking_id,
            price: self.price.clone(),
            network: input.network(),
            last_four_digits: input.last_four(),
        };

        self.transition(GateAction::SubmitCard)?;
        tokio::time::sleep(self.processing_delay).await;

        let outcome = self.outcome.decide(&attempt).await;
        self.form.clear();

        match outcome {
            PaymentOutcome::Granted => {
                self.resolver
                    .record(
                        attempt.tracking_id.as_str(),
                        &attempt.price,
                        Some(attempt.network),
                        attempt.last_four_digits,
                    )
                    .await;
                self.transition(GateAction::Outcome { granted: true })?;
                self.notify(NoticeLevel::Success, "Payment accepted.".to_string());
                self.reveal().await?;
            }
            PaymentOutcome::Declined { reason } => {
                warn!("Payment for {} declined: {}", attempt.tracking_id, reason);
                self.transition(GateAction::Outcome { granted: false })?;
                self.notify(NoticeLevel::Error, reason);
            }
        }

        Ok(self.state)
    }

    /// Acknowledge a denial and leave the flow.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] outside `Denied`.
    pub fn acknowledge(&mut self) -> Result<()> {
        self.transition(GateAction::Acknowledge)?;
        self.reset_flow();
        Ok(())
    }

    /// Tear down the flow. Any resolution still in flight is discarded.
    pub fn dismiss(&mut self) {
        self.reset_flow();
        if self.state != GateState::Idle {
            // Dismiss is accepted from every state
            let _ = self.transition(GateAction::Dismiss);
        }
    }

    async fn reveal(&mut self) -> Result<()> {
        let tracking_id = self.current_tracking_id()?;

        match self.shipments.find(tracking_id.as_str()).await {
            Ok(Some(shipment)) => {
                info!("Revealed tracking history for {}", tracking_id);
                self.shipment = Some(shipment);
                self.notify(NoticeLevel::Success, "Tracking history unlocked.".to_string());
                Ok(())
            }
            Ok(None) => {
                self.resolver.revoke(tracking_id.as_str()).await;
                let err = Error::ShipmentNotFound(tracking_id.to_string());
                self.fail_lookup(&err)?;
                Err(err)
            }
            Err(e) => {
                warn!("Shipment lookup failed for {}: {}", tracking_id, e);
                self.fail_lookup(&e)?;
                Err(e)
            }
        }
    }

    fn fail_lookup(&mut self, err: &Error) -> Result<()> {
        self.transition(GateAction::LookupFailed)?;
        self.reset_flow();
        self.notify(NoticeLevel::Error, err.to_string());
        Ok(())
    }

    fn current_tracking_id(&self) -> Result<TrackingId> {
        self.tracking_id.clone().ok_or_else(|| Error::InvalidTransition {
            state: self.state.to_string(),
            action: "continue without a tracking identifier",
        })
    }

    fn expect_state(&self, expected: GateState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                state: self.state.to_string(),
                action,
            })
        }
    }

    /// Forget the current flow and invalidate outstanding tickets.
    fn reset_flow(&mut self) {
        self.generation += 1;
        self.tracking_id = None;
        self.shipment = None;
        self.form.clear();
    }

    fn transition(&mut self, action: GateAction) -> Result<()> {
        let next = self
            .state
            .next(action)
            .ok_or_else(|| Error::InvalidTransition {
                state: self.state.to_string(),
                action: action.name(),
            })?;

        let from = std::mem::replace(&mut self.state, next);
        debug!("Gate {} -> {}", from, next);
        let _ = self.events_tx.send(GateEvent::StateChanged { from, to: next });
        Ok(())
    }

    fn notify(&self, level: NoticeLevel, message: String) {
        let _ = self.events_tx.send(GateEvent::Notice { level, message });
    }
}
