//! End-to-end CLTV pipeline: clean, aggregate, derive, scale, segment

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::aggregate::aggregate_customers;
use super::clean::{clean_transactions, CleaningStats, DEFAULT_CANCELLATION_MARKER};
use super::error::CltvError;
use super::loader::ColumnMapping;
use super::metrics::{derive_metrics, PopulationRates};
use super::normalize::min_max_scale;
use super::segment::{assign_segments, Segment, SegmentationWarning};
use super::transaction::RawTransaction;

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub columns: ColumnMapping,
    pub cancellation_marker: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            cancellation_marker: DEFAULT_CANCELLATION_MARKER.to_string(),
        }
    }
}

/// One row of the output table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerCltv {
    pub customer_id: String,
    pub total_transactions: u64,
    pub total_units: i64,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub purchase_frequency: f64,
    pub profit_margin: f64,
    pub customer_value: f64,
    pub cltv: f64,
    pub scaled_cltv: f64,
    pub segment: Segment,
}

/// count / mean / sum of one output column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub sum: f64,
}

impl ColumnStats {
    fn over(column: &str, values: impl Iterator<Item = f64>) -> Self {
        let (count, sum) = values.fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
        let mean = if count > 0 { sum / count as f64 } else { 0.0 };
        Self {
            column: column.to_string(),
            count,
            mean,
            sum,
        }
    }
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize)]
pub struct CltvReport {
    /// Sorted by scaled CLTV descending, then customer id ascending
    pub customers: Vec<CustomerCltv>,
    pub rates: PopulationRates,
    pub cleaning: CleaningStats,
    /// True when every CLTV was equal and scaling fell back to a constant
    pub scale_degenerate: bool,
    pub warnings: Vec<SegmentationWarning>,
}

impl CltvReport {
    /// count / mean / sum over the headline columns
    pub fn population_summary(&self) -> Vec<ColumnStats> {
        let rows = &self.customers;
        vec![
            ColumnStats::over(
                "total_transactions",
                rows.iter().map(|c| c.total_transactions as f64),
            ),
            ColumnStats::over("total_units", rows.iter().map(|c| c.total_units as f64)),
            ColumnStats::over("total_revenue", rows.iter().map(|c| c.total_revenue)),
            ColumnStats::over("cltv", rows.iter().map(|c| c.cltv)),
            ColumnStats::over("scaled_cltv", rows.iter().map(|c| c.scaled_cltv)),
        ]
    }

    /// Customers per segment, highest segment first
    pub fn segment_counts(&self) -> Vec<(Segment, usize)> {
        Segment::ALL
            .iter()
            .rev()
            .map(|&segment| {
                let count = self
                    .customers
                    .iter()
                    .filter(|c| c.segment == segment)
                    .count();
                (segment, count)
            })
            .collect()
    }
}

/// Run every stage over the raw records.
///
/// Fails with [`CltvError::EmptyInput`] when no customer survives cleaning
/// and with [`CltvError::DegenerateChurn`] when every customer is a repeat
/// customer.
pub fn run_pipeline(
    records: &[RawTransaction],
    config: &PipelineConfig,
) -> Result<CltvReport, CltvError> {
    let cleaned = clean_transactions(records, &config.cancellation_marker);
    if cleaned.transactions.is_empty() {
        return Err(CltvError::EmptyInput);
    }

    let aggregates = aggregate_customers(&cleaned.transactions);
    let (rates, metrics) = derive_metrics(aggregates)?;

    let cltv_values: Vec<f64> = metrics.iter().map(|m| m.cltv).collect();
    let scaled = min_max_scale(&cltv_values);
    let segmentation = assign_segments(&scaled.values);

    let mut customers: Vec<CustomerCltv> = metrics
        .into_iter()
        .zip(scaled.values.iter())
        .zip(segmentation.segments.iter())
        .map(|((m, &scaled_cltv), &segment)| CustomerCltv {
            customer_id: m.aggregate.customer_id,
            total_transactions: m.aggregate.total_transactions,
            total_units: m.aggregate.total_units,
            total_revenue: m.aggregate.total_revenue,
            avg_order_value: m.avg_order_value,
            purchase_frequency: m.purchase_frequency,
            profit_margin: m.profit_margin,
            customer_value: m.customer_value,
            cltv: m.cltv,
            scaled_cltv,
            segment,
        })
        .collect();

    customers.sort_by(|a, b| match b.scaled_cltv.total_cmp(&a.scaled_cltv) {
        Ordering::Equal => a.customer_id.cmp(&b.customer_id),
        other => other,
    });

    Ok(CltvReport {
        customers,
        rates,
        cleaning: cleaned.stats,
        scale_degenerate: scaled.degenerate,
        warnings: segmentation.warning.into_iter().collect(),
    })
}
