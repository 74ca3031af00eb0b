//! Per-customer aggregation of cleaned transactions

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::transaction::Transaction;

/// Totals for one customer across all of their cleaned transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerAggregate {
    pub customer_id: String,
    /// Number of distinct invoices (not line items)
    pub total_transactions: u64,
    pub total_units: i64,
    pub total_revenue: f64,
}

#[derive(Default)]
struct Accumulator<'a> {
    invoices: BTreeSet<&'a str>,
    units: i64,
    revenue: f64,
}

/// Group cleaned transactions by customer.
///
/// Customers are returned ordered by id. Revenue is summed line by line in
/// input order. A customer only appears if they have at least one
/// transaction, so `total_transactions >= 1` always holds.
pub fn aggregate_customers(transactions: &[Transaction]) -> Vec<CustomerAggregate> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for t in transactions {
        let acc = groups.entry(t.customer_id.as_str()).or_default();
        acc.invoices.insert(t.invoice_id.as_str());
        acc.units += t.quantity;
        acc.revenue += t.revenue();
    }

    groups
        .into_iter()
        .map(|(customer_id, acc)| CustomerAggregate {
            customer_id: customer_id.to_string(),
            total_transactions: acc.invoices.len() as u64,
            total_units: acc.units,
            total_revenue: acc.revenue,
        })
        .collect()
}
