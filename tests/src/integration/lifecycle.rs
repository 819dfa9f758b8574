//! # Integration Test Flows
//!
//! Drives the ledger the way the hosting platform would: a sequence of
//! independent invocations, each with its own transaction id and timestamp,
//! against one shared state store. Covers the full donation lifecycle,
//! all-or-nothing commit behavior, and the string-argument dispatch
//! boundary.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use hemoledger_chaincode::prelude::*;
    use uuid::Uuid;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Installs a subscriber so `RUST_LOG=debug cargo test` shows the
    /// ledger's structured logs. Safe to call from every test.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Fresh ledger over a shared in-memory store.
    fn ledger() -> (
        BloodLedgerService<InMemoryStateStore>,
        Arc<InMemoryStateStore>,
    ) {
        init_tracing();
        let store = Arc::new(InMemoryStateStore::new());
        let service = BloodLedgerService::new(Arc::clone(&store), ServiceConfig::default());
        (service, store)
    }

    /// Invocation context at a fixed point, offset by `secs` for ordering.
    fn ctx_at(secs: u32) -> InvocationContext {
        InvocationContext::at(
            Uuid::new_v4(),
            Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, secs).unwrap(),
        )
    }

    // =============================================================================
    // FULL LIFECYCLE
    // =============================================================================

    /// The reference scenario: donor D1 donates unit U1 (quantity 2), the
    /// unit tests safe, and acceptor A1 consumes it in two acceptances.
    #[tokio::test]
    async fn test_full_donation_lifecycle() {
        let (ledger, _) = ledger();

        ledger
            .register_donor(&ctx_at(0), "D1", "Alice", "O+")
            .await
            .unwrap();
        ledger
            .register_acceptor(&ctx_at(1), "A1", "City Hospital", "Springfield", "555-0101")
            .await
            .unwrap();
        ledger
            .record_donation(&ctx_at(2), "U1", "D1", "O+", 2, "City Hospital", None)
            .await
            .unwrap();

        ledger
            .test_blood(&ctx_at(3), "U1", TestResult::new("Safe"))
            .await
            .unwrap();
        let unit = ledger.query_blood_unit(&ctx_at(3), "U1").await.unwrap();
        assert_eq!(unit.status, UnitStatus::Tested);

        // First acceptance: one unit remains.
        ledger.accept_blood(&ctx_at(4), "U1", "A1", 1).await.unwrap();
        let unit = ledger.query_blood_unit(&ctx_at(4), "U1").await.unwrap();
        assert_eq!(unit.quantity, 1);
        assert_eq!(unit.status, UnitStatus::PartiallyUsed);
        assert_eq!(unit.acceptor_id.as_deref(), Some("A1"));
        let history = ledger.query_usage_history(&ctx_at(4), "A1").await.unwrap();
        assert_eq!(history.len(), 1);

        // Second acceptance drains the unit.
        ledger.accept_blood(&ctx_at(5), "U1", "A1", 1).await.unwrap();
        let unit = ledger.query_blood_unit(&ctx_at(5), "U1").await.unwrap();
        assert_eq!(unit.quantity, 0);
        assert_eq!(unit.status, UnitStatus::Used);

        let mut history = ledger.query_usage_history(&ctx_at(5), "A1").await.unwrap();
        assert_eq!(history.len(), 2);
        // Store order is unspecified; sort client-side for assertions.
        history.sort_by(|a, b| a.date.cmp(&b.date));
        assert_eq!(history[0].date, "2026-01-05 12:00:04");
        assert_eq!(history[1].date, "2026-01-05 12:00:05");
        assert!(history.iter().all(|h| h.unit_id == "U1" && h.quantity == 1));

        // A drained unit admits no further acceptance.
        let err = ledger
            .accept_blood(&ctx_at(6), "U1", "A1", 1)
            .await
            .unwrap_err();
        assert!(err.is_domain_violation());
    }

    #[tokio::test]
    async fn test_unsafe_unit_is_quarantined_end_to_end() {
        let (ledger, _) = ledger();

        ledger
            .record_donation(&ctx_at(0), "U1", "D1", "B-", 3, "City Hospital", None)
            .await
            .unwrap();
        ledger
            .test_blood(&ctx_at(1), "U1", TestResult::new("Contaminated"))
            .await
            .unwrap();

        let unit = ledger.query_blood_unit(&ctx_at(1), "U1").await.unwrap();
        assert_eq!(unit.status, UnitStatus::Unsafe);

        // No consumption, and no back-door through re-testing as safe.
        let err = ledger
            .accept_blood(&ctx_at(2), "U1", "A1", 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::DomainViolation { rule, .. } if rule == rules::NOT_TRANSFUSABLE
        ));
        let err = ledger
            .test_blood(&ctx_at(3), "U1", TestResult::new("Safe"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::DomainViolation { rule, .. } if rule == rules::INVALID_TRANSITION
        ));

        let history = ledger.query_usage_history(&ctx_at(3), "A1").await.unwrap();
        assert!(history.is_empty());
    }

    // =============================================================================
    // ATOMICITY
    // =============================================================================

    /// A rejected acceptance must leave no trace: neither the quantity
    /// decrement nor the history append may land.
    #[tokio::test]
    async fn test_failed_acceptance_commits_nothing() {
        let (ledger, store) = ledger();

        ledger
            .record_donation(&ctx_at(0), "U1", "D1", "O+", 2, "City Hospital", None)
            .await
            .unwrap();
        ledger
            .test_blood(&ctx_at(1), "U1", TestResult::new("Safe"))
            .await
            .unwrap();
        let records_before = store.len();

        let err = ledger
            .accept_blood(&ctx_at(2), "U1", "A1", 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ContractError::DomainViolation { rule, .. } if rule == rules::INSUFFICIENT_QUANTITY
        ));

        assert_eq!(store.len(), records_before);
        let unit = ledger.query_blood_unit(&ctx_at(2), "U1").await.unwrap();
        assert_eq!(unit.quantity, 2);
        assert_eq!(unit.status, UnitStatus::Tested);
        let history = ledger.query_usage_history(&ctx_at(2), "A1").await.unwrap();
        assert!(history.is_empty());
    }

    /// A store outage mid-sequence surfaces as `StoreUnavailable` and the
    /// ledger picks up cleanly once the store returns.
    #[tokio::test]
    async fn test_store_outage_and_recovery() {
        let (ledger, store) = ledger();

        ledger
            .record_donation(&ctx_at(0), "U1", "D1", "O+", 2, "City Hospital", None)
            .await
            .unwrap();
        ledger
            .test_blood(&ctx_at(1), "U1", TestResult::new("Safe"))
            .await
            .unwrap();

        store.set_unavailable(true);
        let err = ledger
            .accept_blood(&ctx_at(2), "U1", "A1", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::StoreUnavailable(_)));

        store.set_unavailable(false);
        let unit = ledger.query_blood_unit(&ctx_at(3), "U1").await.unwrap();
        assert_eq!(unit.quantity, 2);
        assert!(ledger
            .query_usage_history(&ctx_at(3), "A1")
            .await
            .unwrap()
            .is_empty());

        // The same acceptance succeeds after recovery.
        ledger.accept_blood(&ctx_at(4), "U1", "A1", 1).await.unwrap();
    }

    // =============================================================================
    // QUERY FAÇADE
    // =============================================================================

    /// Predicate queries must discriminate document kinds even though the
    /// record shapes share field names.
    #[tokio::test]
    async fn test_queries_discriminate_document_kinds() {
        let (ledger, _) = ledger();

        // Donor and acceptor documents carry bloodType/acceptorID fields
        // that overlap with blood units and history records.
        ledger
            .register_donor(&ctx_at(0), "D1", "Alice", "O+")
            .await
            .unwrap();
        ledger
            .register_acceptor(&ctx_at(0), "A1", "City Hospital", "Springfield", "555-0101")
            .await
            .unwrap();
        ledger
            .record_donation(&ctx_at(1), "U1", "D1", "O+", 2, "City Hospital", Some("A1"))
            .await
            .unwrap();
        ledger
            .test_blood(&ctx_at(2), "U1", TestResult::new("Safe"))
            .await
            .unwrap();
        ledger.accept_blood(&ctx_at(3), "U1", "A1", 1).await.unwrap();

        let by_type = ledger
            .query_blood_units_by_type(&ctx_at(4), "O+")
            .await
            .unwrap();
        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type[0].unit_id, "U1");

        let donated = ledger
            .query_donation_history(&ctx_at(4), "D1")
            .await
            .unwrap();
        assert_eq!(donated.len(), 1);

        // Only the consumption event, not the unit document that also has
        // acceptorID == A1.
        let history = ledger.query_usage_history(&ctx_at(4), "A1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].acceptor_id, "A1");
    }

    // =============================================================================
    // INVOCATION BOUNDARY
    // =============================================================================

    /// The same lifecycle driven entirely through host-style string
    /// invocations.
    #[tokio::test]
    async fn test_lifecycle_through_dispatch() {
        let (ledger, _) = ledger();

        let script = [
            InvokeRequest::new("RegisterDonor", ["D1", "Alice", "O+"]),
            InvokeRequest::new(
                "RegisterAcceptor",
                ["A1", "City Hospital", "Springfield", "555-0101"],
            ),
            InvokeRequest::new("RecordDonation", ["U1", "D1", "O+", "2", "City Hospital"]),
            InvokeRequest::new("TestBlood", ["U1", "Safe"]),
            InvokeRequest::new("AcceptBlood", ["U1", "A1", "1"]),
            InvokeRequest::new("AcceptBlood", ["U1", "A1", "1"]),
        ];
        for (i, call) in script.iter().enumerate() {
            dispatch(&ledger, &ctx_at(i as u32), call)
                .await
                .unwrap_or_else(|e| panic!("step {} ({}) failed: {e}", i + 1, call.function));
        }

        let unit = dispatch(
            &ledger,
            &ctx_at(9),
            &InvokeRequest::new("QueryBloodUnit", ["U1"]),
        )
        .await
        .unwrap();
        assert_eq!(unit["status"], "Used");
        assert_eq!(unit["quantity"], 0);

        let history = dispatch(
            &ledger,
            &ctx_at(9),
            &InvokeRequest::new("QueryUsageHistory", ["A1"]),
        )
        .await
        .unwrap();
        assert_eq!(history.as_array().unwrap().len(), 2);
    }
}
