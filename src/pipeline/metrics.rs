//! Derived CLTV metrics
//!
//! Population scalars (customer count, repeat rate, churn rate) are computed
//! once over the current customer set and passed explicitly into the
//! per-customer formulas.

use serde::Serialize;

use super::aggregate::CustomerAggregate;
use super::error::CltvError;

/// Fraction of revenue taken as profit
pub const PROFIT_MARGIN_RATE: f64 = 0.10;

/// Scalars shared by every customer in one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationRates {
    pub customer_count: usize,
    /// Share of customers with more than one invoice
    pub repeat_rate: f64,
    /// `1 - repeat_rate`
    pub churn_rate: f64,
}

impl PopulationRates {
    /// Compute repeat and churn rates over a customer population.
    ///
    /// Fails with `EmptyInput` for an empty population and with
    /// `DegenerateChurn` when every customer is a repeat customer.
    pub fn from_aggregates(aggregates: &[CustomerAggregate]) -> Result<Self, CltvError> {
        let customer_count = aggregates.len();
        if customer_count == 0 {
            return Err(CltvError::EmptyInput);
        }

        let repeat_customers = aggregates
            .iter()
            .filter(|a| a.total_transactions > 1)
            .count();
        let repeat_rate = repeat_customers as f64 / customer_count as f64;
        let churn_rate = 1.0 - repeat_rate;

        if churn_rate == 0.0 {
            return Err(CltvError::DegenerateChurn {
                customers: customer_count,
            });
        }

        Ok(Self {
            customer_count,
            repeat_rate,
            churn_rate,
        })
    }
}

/// Per-customer metrics derived from an aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMetrics {
    pub aggregate: CustomerAggregate,
    pub avg_order_value: f64,
    pub purchase_frequency: f64,
    pub profit_margin: f64,
    pub customer_value: f64,
    pub cltv: f64,
}

/// `total_revenue / total_transactions`
pub fn average_order_value(total_revenue: f64, total_transactions: u64) -> f64 {
    total_revenue / total_transactions as f64
}

/// A customer's share of transactions relative to the population size
pub fn purchase_frequency(total_transactions: u64, customer_count: usize) -> f64 {
    total_transactions as f64 / customer_count as f64
}

/// Profit attributed to a customer's revenue
pub fn profit_margin(total_revenue: f64) -> f64 {
    total_revenue * PROFIT_MARGIN_RATE
}

/// `(customer_value / churn_rate) * profit_margin`
///
/// `churn_rate` must be non-zero; [`PopulationRates::from_aggregates`]
/// rejects populations where it is.
pub fn customer_lifetime_value(customer_value: f64, churn_rate: f64, profit_margin: f64) -> f64 {
    (customer_value / churn_rate) * profit_margin
}

/// Derive every per-customer metric along with the population rates.
pub fn derive_metrics(
    aggregates: Vec<CustomerAggregate>,
) -> Result<(PopulationRates, Vec<CustomerMetrics>), CltvError> {
    let rates = PopulationRates::from_aggregates(&aggregates)?;

    let metrics = aggregates
        .into_iter()
        .map(|aggregate| {
            let avg_order_value =
                average_order_value(aggregate.total_revenue, aggregate.total_transactions);
            let purchase_frequency =
                purchase_frequency(aggregate.total_transactions, rates.customer_count);
            let profit_margin = profit_margin(aggregate.total_revenue);
            let customer_value = avg_order_value * purchase_frequency;
            let cltv = customer_lifetime_value(customer_value, rates.churn_rate, profit_margin);

            CustomerMetrics {
                aggregate,
                avg_order_value,
                purchase_frequency,
                profit_margin,
                customer_value,
                cltv,
            }
        })
        .collect();

    Ok((rates, metrics))
}
