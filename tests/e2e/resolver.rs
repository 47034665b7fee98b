//! Resolver reconciliation and degradation against a faulty store.

#![allow(clippy::expect_used)]

use super::TestHarness;
use tracking_gate::{AccessStatus, AccessStatusStore, LocalAccessCache};

#[tokio::test]
async fn test_cache_unlock_is_reconciled_into_store() {
    let harness = TestHarness::setup();
    harness.unlock_in_cache("PSE000000001").await;

    assert!(!harness.store.exists("PSE000000001").await.expect("query"));
    assert!(harness.resolver.resolve("PSE000000001").await);
    assert!(harness.store.exists("PSE000000001").await.expect("query"));

    let records = harness.store.records_for("PSE000000001");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, harness.config.pricing.amount_minor);
    assert_eq!(records[0].currency, harness.config.pricing.currency);
}

#[tokio::test]
async fn test_store_query_failure_falls_back_to_cache() {
    let harness = TestHarness::setup();
    harness.unlock_in_cache("PSE000000001").await;
    harness.store.fail_queries(true);

    assert_eq!(
        harness.resolver.resolve_status("PSE000000001").await,
        AccessStatus::CacheFallback
    );
    // Without a usable store answer nothing is written back
    assert_eq!(harness.store.len(), 0);

    assert!(!harness.resolver.resolve("PSE000000002").await);
    assert_eq!(harness.resolver.stats().query_failures, 2);
}

#[tokio::test]
async fn test_reconciliation_write_failure_still_grants() {
    let harness = TestHarness::setup();
    harness.unlock_in_cache("PSE000000001").await;
    harness.store.fail_writes(true);

    assert!(harness.resolver.resolve("PSE000000001").await);

    let stats = harness.resolver.stats();
    assert_eq!(stats.write_failures, 1);
    assert_eq!(stats.reconciliations, 0);
    assert_eq!(harness.store.len(), 0);

    // Once the store recovers the next resolution reconciles
    harness.store.fail_writes(false);
    assert!(harness.resolver.resolve("PSE000000001").await);
    assert_eq!(harness.store.records_for("PSE000000001").len(), 1);
}

#[tokio::test]
async fn test_store_record_wins_over_locked_cache_flag() {
    let harness = TestHarness::setup();
    harness.unlock_in_store("PSE000000001").await;
    harness.cache.set("PSE000000001", false, 30).await;

    assert_eq!(
        harness.resolver.resolve_status("PSE000000001").await,
        AccessStatus::StoreConfirmed
    );
}
