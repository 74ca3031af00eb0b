//! Transaction records as loaded and as cleaned

use serde::{Deserialize, Serialize};

/// One invoice line as supplied by the loader. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub invoice_id: Option<String>,
    pub customer_id: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
}

impl RawTransaction {
    /// Build a fully populated record
    pub fn new(invoice_id: &str, customer_id: &str, quantity: i64, unit_price: f64) -> Self {
        Self {
            invoice_id: Some(invoice_id.to_string()),
            customer_id: Some(customer_id.to_string()),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
        }
    }
}

/// A record that passed cleaning: every field present, quantity positive,
/// invoice not cancelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub invoice_id: String,
    pub customer_id: String,
    pub quantity: i64,
    pub unit_price: f64,
}

impl Transaction {
    /// Line-level revenue, computed per row before any aggregation
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

impl From<Transaction> for RawTransaction {
    fn from(t: Transaction) -> Self {
        Self {
            invoice_id: Some(t.invoice_id),
            customer_id: Some(t.customer_id),
            quantity: Some(t.quantity),
            unit_price: Some(t.unit_price),
        }
    }
}
