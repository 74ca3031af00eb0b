//! Output table: one row per customer, written as CSV or Parquet

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::pipeline::CustomerCltv;

/// Column names of the output table, in order
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "customer_id",
    "total_transactions",
    "total_units",
    "total_revenue",
    "avg_order_value",
    "purchase_frequency",
    "profit_margin",
    "customer_value",
    "cltv",
    "scaled_cltv",
    "segment",
];

/// Build the output DataFrame, preserving row order
pub fn customers_to_dataframe(rows: &[CustomerCltv]) -> Result<DataFrame> {
    let df = df! {
        "customer_id" => rows.iter().map(|r| r.customer_id.as_str()).collect::<Vec<_>>(),
        "total_transactions" => rows.iter().map(|r| r.total_transactions).collect::<Vec<u64>>(),
        "total_units" => rows.iter().map(|r| r.total_units).collect::<Vec<i64>>(),
        "total_revenue" => rows.iter().map(|r| r.total_revenue).collect::<Vec<f64>>(),
        "avg_order_value" => rows.iter().map(|r| r.avg_order_value).collect::<Vec<f64>>(),
        "purchase_frequency" => rows.iter().map(|r| r.purchase_frequency).collect::<Vec<f64>>(),
        "profit_margin" => rows.iter().map(|r| r.profit_margin).collect::<Vec<f64>>(),
        "customer_value" => rows.iter().map(|r| r.customer_value).collect::<Vec<f64>>(),
        "cltv" => rows.iter().map(|r| r.cltv).collect::<Vec<f64>>(),
        "scaled_cltv" => rows.iter().map(|r| r.scaled_cltv).collect::<Vec<f64>>(),
        "segment" => rows.iter().map(|r| r.segment.to_string()).collect::<Vec<String>>(),
    }
    .context("Failed to build customer table")?;

    Ok(df)
}

/// Save the customer table to file (CSV or Parquet based on extension)
pub fn save_customer_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
