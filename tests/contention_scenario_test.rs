//! End-to-end contention scenarios against the in-process mock service

mod common;

use common::{init_test_logging, start_mock_service, MockBehavior};
use stampede_config::StampedeConfig;
use stampede_core::{RunReport, ScenarioRunner, APPROVE_ORDER_OP};
use stampede_http::ApiClient;
use std::sync::Arc;
use std::time::Duration;

fn test_config(
    base_url: &str,
    workers: usize,
    order_count: usize,
    order_unit_value: f64,
    initial_credit: f64,
) -> StampedeConfig {
    let mut config = StampedeConfig::default();
    config.scenario.workers = workers;
    // Generous deadline; runs end early once the seeded orders are exhausted
    config.scenario.duration = Duration::from_secs(30);
    config.scenario.order_count = order_count;
    config.scenario.order_unit_value = order_unit_value;
    config.scenario.initial_credit = initial_credit;
    config.target.base_url = base_url.to_string();
    config
}

async fn run_scenario(config: StampedeConfig) -> RunReport {
    let api = Arc::new(ApiClient::new(config.target.base_url.clone(), &config.http).unwrap());
    ScenarioRunner::new(config).run(api).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scenario_five_workers_exhaust_ten_orders() {
    init_test_logging();
    let (base_url, mock) = start_mock_service(MockBehavior::default()).await;

    let report = run_scenario(test_config(&base_url, 5, 10, 10.0, 1000.0)).await;

    let op = report.metrics.operation(APPROVE_ORDER_OP).unwrap();
    assert_eq!(op.success, 10);
    assert_eq!(op.failure, 0);
    assert_eq!(op.insufficient_credit, 0);

    // Every classified attempt corresponds to exactly one request
    assert_eq!(mock.patch_calls(), op.total());

    assert_eq!(report.reconciliation.approved_count, 10);
    assert_eq!(report.reconciliation.expected_credit, 900.0);
    assert_eq!(report.reconciliation.actual_credit, 900.0);
    assert!(report.reconciliation.passed);
    assert!(report.thresholds.passed());
    assert!(report.passed());

    assert_eq!(mock.approved_count(), 10);
    assert_eq!(mock.partner_credit(1), Some(900.0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scenario_insufficient_credit_is_a_business_rejection() {
    init_test_logging();
    let (base_url, mock) = start_mock_service(MockBehavior::default()).await;

    // One 10.00 order against 5.00 of credit: the single attempt must be
    // rejected by the business rule, not by infrastructure
    let report = run_scenario(test_config(&base_url, 2, 1, 10.0, 5.0)).await;

    let op = report.metrics.operation(APPROVE_ORDER_OP).unwrap();
    assert_eq!(op.success, 0);
    assert_eq!(op.failure, 1);
    assert_eq!(op.insufficient_credit, 1);

    assert_eq!(report.reconciliation.approved_count, 0);
    assert_eq!(report.reconciliation.expected_credit, 5.0);
    assert_eq!(report.reconciliation.actual_credit, 5.0);
    assert!(report.reconciliation.passed);

    // The two verdicts are independent: reconciliation holds while the
    // failure-rate threshold is blown
    assert!(!report.thresholds.passed());
    assert!(!report.passed());

    assert_eq!(mock.approved_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lost_update_race_is_detected_by_reconciliation() {
    init_test_logging();
    let (base_url, _mock) = start_mock_service(MockBehavior {
        lost_update_mode: true,
        ..Default::default()
    })
    .await;

    // The mock approves all 20 orders but loses every second debit, the
    // exact aftermath of an unlocked read-modify-write on the credit
    let report = run_scenario(test_config(&base_url, 8, 20, 10.0, 1000.0)).await;

    assert_eq!(report.reconciliation.approved_count, 20);
    assert_eq!(report.reconciliation.expected_credit, 800.0);
    assert_eq!(report.reconciliation.actual_credit, 900.0);
    assert!(!report.reconciliation.passed);
    assert_eq!(report.reconciliation.discrepancy(), 100.0);
    assert!(!report.passed());

    let rendered = report.render();
    assert!(rendered.contains("Reconciliation: FAIL"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn credit_exhaustion_rejects_the_tail_of_the_batch() {
    init_test_logging();
    let (base_url, mock) = start_mock_service(MockBehavior::default()).await;

    // Credit covers only 5 of the 8 seeded orders; the rest must surface as
    // business rejections and the conservation law must still hold
    let report = run_scenario(test_config(&base_url, 4, 8, 10.0, 50.0)).await;

    let op = report.metrics.operation(APPROVE_ORDER_OP).unwrap();
    assert_eq!(op.success, 5);
    assert_eq!(op.failure, 3);
    assert_eq!(op.insufficient_credit, 3);

    assert_eq!(report.reconciliation.approved_count, 5);
    assert_eq!(report.reconciliation.expected_credit, 0.0);
    assert!(report.reconciliation.passed);
    assert_eq!(mock.partner_credit(1), Some(0.0));
}
