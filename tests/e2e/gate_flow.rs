//! Access gate scenarios from identifier entry to outcome.

#![allow(clippy::expect_used)]

use super::harness::{drain, valid_card, UnreachableShipments};
use super::TestHarness;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracking_gate::card::CardField;
use tracking_gate::gate::SIMULATED_DECLINE_MESSAGE;
use tracking_gate::{
    AlwaysGrant, Error, GateEvent, GateState, LocalAccessCache, Network, NoticeLevel,
};

fn changed(from: GateState, to: GateState) -> GateEvent {
    GateEvent::StateChanged { from, to }
}

#[tokio::test]
async fn test_unpaid_identifier_then_cancel() {
    let harness = TestHarness::setup();
    let mut gate = harness.gate();
    let mut events = gate.subscribe();

    let state = gate.submit_identifier("PSE000000001").await.expect("submit");
    assert_eq!(state, GateState::PaymentRequired);

    gate.cancel().expect("cancel");
    assert_eq!(gate.state(), GateState::Idle);
    assert!(gate.tracking_id().is_none());
    assert_eq!(harness.store.len(), 0);

    assert_eq!(
        drain(&mut events),
        vec![
            changed(GateState::Idle, GateState::Searching),
            changed(GateState::Searching, GateState::PaymentRequired),
            changed(GateState::PaymentRequired, GateState::Idle),
            GateEvent::Notice {
                level: NoticeLevel::Info,
                message: "Payment cancelled. Detailed tracking remains locked.".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_valid_card_is_denied_after_delay_without_recording() {
    let harness = TestHarness::setup();
    harness.add_shipment("PSE000000001");
    let mut gate = harness.gate();

    gate.submit_identifier("PSE000000001").await.expect("submit");
    let mut events = gate.subscribe();

    gate.fill_card(valid_card()).expect("editable");
    assert!(gate.can_submit_payment());

    let started = Instant::now();
    let state = gate.submit_payment().await.expect("processed");
    assert!(started.elapsed() >= Duration::from_millis(TestHarness::PROCESSING_DELAY_MS));

    assert_eq!(state, GateState::Denied);
    assert_eq!(
        drain(&mut events),
        vec![
            changed(GateState::PaymentRequired, GateState::Processing),
            changed(GateState::Processing, GateState::Denied),
            GateEvent::Notice {
                level: NoticeLevel::Error,
                message: SIMULATED_DECLINE_MESSAGE.to_string(),
            },
        ]
    );

    // A denied attempt touches neither source
    assert_eq!(harness.store.len(), 0);
    assert_eq!(harness.cache.get("PSE000000001").await, None);
    assert!(gate.shipment().is_none());

    gate.acknowledge().expect("acknowledge");
    assert_eq!(gate.state(), GateState::Idle);
}

#[tokio::test]
async fn test_card_form_gates_submission_field_by_field() {
    let harness = TestHarness::setup();
    let mut gate = harness.gate();
    gate.submit_identifier("PSE000000001").await.expect("submit");

    let card = valid_card();
    gate.update_card(CardField::CardNumber, "4111 1111 1111 1111")
        .expect("editable");
    gate.update_card(CardField::ExpiryDate, &card.expiry_date)
        .expect("editable");
    gate.update_card(CardField::Cvv, "123").expect("editable");
    assert!(!gate.can_submit_payment());

    let errors = gate
        .update_card(CardField::HolderName, "john doe")
        .expect("editable");
    assert!(errors.is_valid());
    assert!(gate.can_submit_payment());
    assert_eq!(gate.form().input().network(), Network::Visa);
}

#[tokio::test]
async fn test_previously_unlocked_identifier_reveals_shipment() {
    let harness = TestHarness::setup();
    harness.add_shipment("PSE000000001");
    harness.unlock_in_store("PSE000000001").await;
    let mut gate = harness.gate();

    let state = gate.submit_identifier("pse000000001").await.expect("submit");

    assert_eq!(state, GateState::Authorized);
    let shipment = gate.shipment().expect("revealed");
    assert_eq!(shipment.tracking_id, "PSE000000001");
    assert_eq!(shipment.status, "Delivered");
}

#[tokio::test]
async fn test_cached_unlock_without_shipment_is_revoked() {
    let harness = TestHarness::setup();
    harness.unlock_in_cache("PSE999999999").await;
    let mut gate = harness.gate();
    let mut events = gate.subscribe();

    let err = gate
        .submit_identifier("PSE999999999")
        .await
        .expect_err("no shipment");

    assert!(matches!(err, Error::ShipmentNotFound(_)));
    assert_eq!(gate.state(), GateState::Idle);
    assert_eq!(harness.cache.get("PSE999999999").await, None);
    assert_eq!(harness.resolver.stats().revocations, 1);

    let events = drain(&mut events);
    assert_eq!(
        &events[..3],
        &[
            changed(GateState::Idle, GateState::Searching),
            changed(GateState::Searching, GateState::Authorized),
            changed(GateState::Authorized, GateState::Idle),
        ]
    );
    assert!(matches!(
        events.last(),
        Some(GateEvent::Notice {
            level: NoticeLevel::Error,
            ..
        })
    ));
}

#[tokio::test]
async fn test_shipment_lookup_failure_keeps_cached_unlock() {
    let harness = TestHarness::setup();
    harness.unlock_in_cache("PSE000000001").await;
    let mut gate = harness.gate_over(Arc::new(UnreachableShipments));
    let mut events = gate.subscribe();

    let err = gate
        .submit_identifier("PSE000000001")
        .await
        .expect_err("lookup fails");

    assert!(matches!(err, Error::Lookup(_)));
    assert_eq!(gate.state(), GateState::Idle);
    assert!(gate.tracking_id().is_none());

    // A transport failure is not a not-found: the unlock flag stays
    assert_eq!(harness.cache.get("PSE000000001").await, Some(true));
    assert_eq!(harness.resolver.stats().revocations, 0);

    let events = drain(&mut events);
    assert_eq!(
        &events[..3],
        &[
            changed(GateState::Idle, GateState::Searching),
            changed(GateState::Searching, GateState::Authorized),
            changed(GateState::Authorized, GateState::Idle),
        ]
    );
    assert_eq!(
        events.last(),
        Some(&GateEvent::Notice {
            level: NoticeLevel::Error,
            message: "shipment lookup error: timeout".to_string(),
        })
    );
}

#[tokio::test]
async fn test_granting_policy_records_access() {
    let harness = TestHarness::setup();
    harness.add_shipment("PSE000000001");
    let mut gate = harness.gate_with(Arc::new(AlwaysGrant));

    gate.submit_identifier("PSE000000001").await.expect("submit");
    gate.fill_card(valid_card()).expect("editable");
    let state = gate.submit_payment().await.expect("processed");

    assert_eq!(state, GateState::Authorized);
    assert!(gate.shipment().is_some());

    let records = harness.store.records_for("PSE000000001");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].network, Some(Network::Visa));
    assert_eq!(records[0].last_four_digits.as_deref(), Some("1111"));
    assert_eq!(harness.cache.get("PSE000000001").await, Some(true));

    // A fresh gate now resolves straight to the shipment
    let mut next = harness.gate();
    let state = next.submit_identifier("PSE000000001").await.expect("submit");
    assert_eq!(state, GateState::Authorized);
}

#[tokio::test]
async fn test_store_outage_does_not_block_flow() {
    let harness = TestHarness::setup();
    harness.store.fail_queries(true);
    let mut gate = harness.gate();

    let state = gate.submit_identifier("PSE000000001").await.expect("submit");
    assert_eq!(state, GateState::PaymentRequired);
}

#[tokio::test]
async fn test_newer_submission_supersedes_in_flight_resolution() {
    let harness = TestHarness::setup();
    harness.store.slow(true);
    harness.unlock_in_store("PSE000000001").await;
    let mut gate = harness.gate();

    let first = gate.begin_search("PSE000000001").expect("ticket");
    let resolver = Arc::clone(&harness.resolver);
    let in_flight = tokio::spawn(async move { resolver.resolve("PSE000000001").await });

    let second = gate.begin_search("PSE000000002").expect("ticket");
    let granted = harness.resolver.resolve(second.tracking_id().as_str()).await;
    assert!(gate.apply_resolution(&second, granted).expect("apply"));
    assert_eq!(gate.state(), GateState::PaymentRequired);

    let late = in_flight.await.expect("join");
    assert!(late);
    assert!(!gate.apply_resolution(&first, late).expect("apply"));
    assert_eq!(gate.state(), GateState::PaymentRequired);
    assert_eq!(
        gate.tracking_id().map(|id| id.as_str()),
        Some("PSE000000002")
    );
}

#[tokio::test]
async fn test_result_after_dismiss_is_discarded() {
    let harness = TestHarness::setup();
    let mut gate = harness.gate();

    gate.submit_identifier("PSE000000001").await.expect("submit");
    let stale = gate.begin_search("PSE000000002").expect("ticket");
    gate.dismiss();

    assert!(!gate.apply_resolution(&stale, true).expect("apply"));
    assert_eq!(gate.state(), GateState::Idle);
}
