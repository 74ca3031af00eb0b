//! Transaction cleaning
//!
//! Drops cancelled invoices, returns (non-positive quantities), negative unit
//! prices and rows with a missing required field. Bad rows are excluded silently; the counts per
//! reason are kept for reporting.

use serde::Serialize;

use super::transaction::{RawTransaction, Transaction};

/// Invoice ids containing this substring are cancellations
pub const DEFAULT_CANCELLATION_MARKER: &str = "C";

/// Why a record was excluded during cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Invoice id carries the cancellation marker
    Cancelled,
    /// Quantity is zero or negative
    NonPositiveQuantity,
    /// Unit price is below zero
    NegativePrice,
    /// Invoice, customer, quantity or unit price is absent
    MissingField,
}

/// Per-reason counts from a cleaning pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningStats {
    pub input_rows: usize,
    pub kept_rows: usize,
    pub dropped_cancelled: usize,
    pub dropped_non_positive: usize,
    pub dropped_negative_price: usize,
    pub dropped_missing: usize,
}

impl CleaningStats {
    /// Total number of excluded rows
    pub fn dropped_rows(&self) -> usize {
        self.dropped_cancelled
            + self.dropped_non_positive
            + self.dropped_negative_price
            + self.dropped_missing
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::Cancelled => self.dropped_cancelled += 1,
            DropReason::NonPositiveQuantity => self.dropped_non_positive += 1,
            DropReason::NegativePrice => self.dropped_negative_price += 1,
            DropReason::MissingField => self.dropped_missing += 1,
        }
    }
}

/// Output of [`clean_transactions`]
#[derive(Debug, Clone)]
pub struct CleanedTransactions {
    pub transactions: Vec<Transaction>,
    pub stats: CleaningStats,
}

/// Decide whether a record should be dropped.
///
/// Rules are checked in a fixed order so a row failing several of them is
/// always attributed to the same reason: cancellation, then quantity, then
/// negative price, then missing fields. A zero price is kept. A missing invoice or quantity can only be reported as
/// `MissingField`.
pub fn classify(record: &RawTransaction, cancellation_marker: &str) -> Option<DropReason> {
    if let Some(invoice) = &record.invoice_id {
        if invoice.contains(cancellation_marker) {
            return Some(DropReason::Cancelled);
        }
    }

    if let Some(quantity) = record.quantity {
        if quantity <= 0 {
            return Some(DropReason::NonPositiveQuantity);
        }
    }

    if record.unit_price.is_some_and(|price| price < 0.0) {
        return Some(DropReason::NegativePrice);
    }

    let price_present = record.unit_price.is_some_and(f64::is_finite);
    if record.invoice_id.is_none()
        || record.customer_id.is_none()
        || record.quantity.is_none()
        || !price_present
    {
        return Some(DropReason::MissingField);
    }

    None
}

/// Filter raw records down to those usable for aggregation.
///
/// Input order is preserved, so downstream summation order is stable.
pub fn clean_transactions(
    records: &[RawTransaction],
    cancellation_marker: &str,
) -> CleanedTransactions {
    let mut stats = CleaningStats {
        input_rows: records.len(),
        ..Default::default()
    };
    let mut transactions = Vec::with_capacity(records.len());

    for record in records {
        if let Some(reason) = classify(record, cancellation_marker) {
            stats.record(reason);
            continue;
        }

        // classify() guarantees every field is present here
        if let (Some(invoice_id), Some(customer_id), Some(quantity), Some(unit_price)) = (
            record.invoice_id.clone(),
            record.customer_id.clone(),
            record.quantity,
            record.unit_price,
        ) {
            transactions.push(Transaction {
                invoice_id,
                customer_id,
                quantity,
                unit_price,
            });
        }
    }

    stats.kept_rows = transactions.len();

    CleanedTransactions {
        transactions,
        stats,
    }
}
