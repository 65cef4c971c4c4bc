#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use lnbridge_core::rpc::lightning::PaymentFailureReason;
use lnbridge_node::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
payment:
  retry:
    reset_routing_dta: false # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.bridge.event_queue_capacity, 1024);
    assert_eq!(cfg.payment.timeout_seconds, 60);
    assert_eq!(cfg.payment.fee_limit_sat, 50000);
    assert_eq!(cfg.payment.max_parts, 16);
    assert!(cfg.payment.retry.reset_routing_data);
    assert!(cfg.payment.retry.refresh_edges);
    assert!(cfg.payment.retry.is_retryable(PaymentFailureReason::NoRoute));
    assert!(cfg.payment.retry.is_retryable(PaymentFailureReason::InsufficientBalance));
    assert!(!cfg.payment.retry.is_retryable(PaymentFailureReason::Timeout));
    assert_eq!(cfg.invoice.expiry_seconds, 3600);
}

#[test]
fn retryable_reasons_are_configurable() {
    let ok = r#"
version: 1
payment:
  retry:
    refresh_edges: false
    retryable_reasons: [no_route, timeout]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert!(!cfg.payment.retry.refresh_edges);
    assert!(cfg.payment.retry.is_retryable(PaymentFailureReason::Timeout));
    assert!(!cfg.payment.retry.is_retryable(PaymentFailureReason::InsufficientBalance));
}

#[test]
fn rejects_none_as_retryable() {
    let bad = r#"
version: 1
payment:
  retry:
    retryable_reasons: [none]
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn rejects_out_of_range_values() {
    for bad in [
        "version: 1\nbridge:\n  event_queue_capacity: 8\n",
        "version: 1\npayment:\n  timeout_seconds: 0\n",
        "version: 1\npayment:\n  max_parts: 500\n",
        "version: 1\ninvoice:\n  expiry_seconds: 0\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code().as_str(), "CONFIG", "{bad}");
    }
}

#[test]
fn rejects_unknown_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}
