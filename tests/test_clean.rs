//! Unit tests for transaction cleaning

use cltv::pipeline::{
    clean_transactions, run_pipeline, PipelineConfig, RawTransaction,
    DEFAULT_CANCELLATION_MARKER,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_negative_quantity_excluded_from_output() {
    let records = vec![
        RawTransaction::new("536365", "17850", 6, 2.55),
        RawTransaction::new("536366", "13047", 1, 3.0),
        RawTransaction::new("536380", "14527", -5, 4.25),
    ];

    let report = run_pipeline(&records, &PipelineConfig::default()).unwrap();

    assert!(
        report.customers.iter().all(|c| c.customer_id != "14527"),
        "Customer with only a negative-quantity line should be absent"
    );
    assert_eq!(report.customers.len(), 2);
}

#[test]
fn test_negative_price_excluded_from_output() {
    // Bad-debt adjustment lines carry a negative price and a positive quantity
    let records = vec![
        RawTransaction::new("536365", "17850", 6, 2.55),
        RawTransaction::new("536366", "13047", 1, 3.0),
        RawTransaction::new("A563186", "13047", 1, -50.0),
        RawTransaction::new("A563187", "14527", 1, -11062.06),
    ];

    let cleaned = clean_transactions(&records, DEFAULT_CANCELLATION_MARKER);
    assert_eq!(cleaned.stats.dropped_negative_price, 2);

    let report = run_pipeline(&records, &PipelineConfig::default()).unwrap();

    assert!(report.customers.iter().all(|c| c.customer_id != "14527"));
    assert_eq!(report.customers.len(), 2);
    for c in &report.customers {
        assert!(c.total_revenue >= 0.0);
        assert!(c.avg_order_value >= 0.0);
        assert!(c.profit_margin >= 0.0);
        assert!(c.cltv >= 0.0);
        assert!((0.0..=1.0).contains(&c.scaled_cltv));
    }
    common::assert_close(
        report
            .customers
            .iter()
            .find(|c| c.customer_id == "13047")
            .map(|c| c.total_revenue)
            .unwrap(),
        3.0,
        "revenue without the adjustment",
    );
}

#[test]
fn test_cancelled_invoice_excluded_even_with_positive_quantity() {
    let records = vec![
        RawTransaction::new("536365", "17850", 6, 2.55),
        RawTransaction::new("C536379", "17850", 10, 100.0),
        RawTransaction::new("C536380", "99999", 10, 100.0),
    ];

    let cleaned = clean_transactions(&records, DEFAULT_CANCELLATION_MARKER);

    assert_eq!(cleaned.transactions.len(), 1);
    assert_eq!(cleaned.stats.dropped_cancelled, 2);

    let report = run_pipeline(&records, &PipelineConfig::default()).unwrap();
    assert_eq!(report.customers.len(), 1);
    assert_eq!(report.customers[0].total_transactions, 1);
    common::assert_close(report.customers[0].total_revenue, 15.3, "revenue");
}

#[test]
fn test_marker_anywhere_in_invoice_id() {
    let records = vec![
        RawTransaction::new("53C6365", "1", 1, 1.0),
        RawTransaction::new("536365C", "1", 1, 1.0),
    ];

    let cleaned = clean_transactions(&records, DEFAULT_CANCELLATION_MARKER);
    assert!(cleaned.transactions.is_empty());
}

#[test]
fn test_missing_fields_dropped_not_imputed() {
    let full = RawTransaction::new("1", "a", 2, 3.0);
    let records = vec![
        RawTransaction {
            customer_id: None,
            ..full.clone()
        },
        RawTransaction {
            quantity: None,
            ..full.clone()
        },
        RawTransaction {
            unit_price: None,
            ..full.clone()
        },
        RawTransaction {
            invoice_id: None,
            ..full.clone()
        },
        full,
    ];

    let cleaned = clean_transactions(&records, DEFAULT_CANCELLATION_MARKER);

    assert_eq!(cleaned.transactions.len(), 1);
    assert_eq!(cleaned.stats.dropped_missing, 4);
}

#[test]
fn test_cleaning_is_idempotent() {
    let records = common::create_random_records(50, 7);
    let once = clean_transactions(&records, DEFAULT_CANCELLATION_MARKER);

    let as_raw: Vec<RawTransaction> = once
        .transactions
        .iter()
        .cloned()
        .map(RawTransaction::from)
        .collect();
    let twice = clean_transactions(&as_raw, DEFAULT_CANCELLATION_MARKER);

    assert_eq!(once.transactions, twice.transactions);
    assert_eq!(twice.stats.dropped_rows(), 0);
}

#[test]
fn test_cleaning_preserves_input_order() {
    let records = vec![
        RawTransaction::new("3", "c", 1, 1.0),
        RawTransaction::new("C2", "b", 1, 1.0),
        RawTransaction::new("1", "a", 1, 1.0),
    ];

    let cleaned = clean_transactions(&records, DEFAULT_CANCELLATION_MARKER);
    let invoices: Vec<&str> = cleaned
        .transactions
        .iter()
        .map(|t| t.invoice_id.as_str())
        .collect();

    assert_eq!(invoices, vec!["3", "1"]);
}
