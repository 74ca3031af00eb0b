//! Transaction loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::transaction::RawTransaction;

/// Names of the source columns holding the required transaction fields.
///
/// Defaults match the Online Retail II export headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub invoice: String,
    pub customer: String,
    pub quantity: String,
    pub price: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            invoice: "Invoice".to_string(),
            customer: "Customer ID".to_string(),
            quantity: "Quantity".to_string(),
            price: "Price".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Column names in the order invoice, customer, quantity, price
    pub fn required(&self) -> [&str; 4] {
        [
            self.invoice.as_str(),
            self.customer.as_str(),
            self.quantity.as_str(),
            self.price.as_str(),
        ]
    }
}

/// Records read from a dataset plus basic load statistics
#[derive(Debug, Clone)]
pub struct LoadedTransactions {
    pub records: Vec<RawTransaction>,
    pub rows: usize,
    pub memory_mb: f64,
}

/// Load a dataset from a file (CSV or Parquet based on extension)
///
/// `infer_schema_length` applies to CSV only; 0 means full table scan.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(schema_length)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    Ok(lf)
}

/// Read a dataset and project it into raw transaction records
pub fn load_transactions(
    path: &Path,
    columns: &ColumnMapping,
    infer_schema_length: usize,
) -> Result<LoadedTransactions> {
    let df = load_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let rows = df.height();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    let records = transactions_from_dataframe(&df, columns)?;

    Ok(LoadedTransactions {
        records,
        rows,
        memory_mb,
    })
}

/// Convert the required columns of a DataFrame into raw transaction records.
///
/// Nulls are kept as `None`; cleaning decides what to do with them. Other
/// columns are ignored.
pub fn transactions_from_dataframe(
    df: &DataFrame,
    columns: &ColumnMapping,
) -> Result<Vec<RawTransaction>> {
    let available: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for name in columns.required() {
        if !available.iter().any(|c| c == name) {
            anyhow::bail!(
                "Required column '{}' not found in dataset. Available columns: {:?}",
                name,
                available
            );
        }
    }

    let invoice = df
        .column(&columns.invoice)?
        .cast(&DataType::String)
        .with_context(|| format!("Invoice column '{}' cannot be read as text", columns.invoice))?;
    let customer = customer_ids(df.column(&columns.customer)?)
        .with_context(|| format!("Customer column '{}' cannot be read", columns.customer))?;
    let quantity = quantities(df.column(&columns.quantity)?)
        .with_context(|| format!("Quantity column '{}' must hold whole numbers", columns.quantity))?;
    let price = df
        .column(&columns.price)?
        .cast(&DataType::Float64)
        .with_context(|| format!("Price column '{}' must be numeric", columns.price))?;

    let records = invoice
        .str()?
        .into_iter()
        .zip(customer)
        .zip(quantity)
        .zip(price.f64()?.into_iter())
        .map(|(((invoice_id, customer_id), quantity), unit_price)| RawTransaction {
            invoice_id: invoice_id.map(str::to_string),
            customer_id,
            quantity,
            unit_price,
        })
        .collect();

    Ok(records)
}

/// Render customer ids as text.
///
/// Spreadsheet exports store `17850` as `17850.0`, so whole float ids print
/// without the fractional part. Any other float keeps its digits and stays a
/// distinct id. NaN counts as missing.
fn customer_ids(column: &Column) -> Result<Vec<Option<String>>> {
    if column.dtype().is_float() {
        let ids = column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|id| match id {
                Some(v) if v.is_finite() && v.fract() == 0.0 => Some(format!("{:.0}", v)),
                Some(v) if v.is_finite() => Some(v.to_string()),
                _ => None,
            })
            .collect();
        return Ok(ids);
    }

    let ids = column
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .map(|id| id.map(str::to_string))
        .collect();
    Ok(ids)
}

/// Read quantities as whole numbers.
///
/// Float columns are accepted only when every value is integral, and text
/// columns only when every value parses as an integer. Anything else is an
/// error naming the first offending row rather than a silent truncation.
fn quantities(column: &Column) -> Result<Vec<Option<i64>>> {
    let dtype = column.dtype();

    if dtype.is_integer() {
        return Ok(column.cast(&DataType::Int64)?.i64()?.into_iter().collect());
    }

    if dtype.is_float() {
        let values = column.cast(&DataType::Float64)?;
        return values
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                None => Ok(None),
                Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                    Ok(Some(v as i64))
                }
                Some(v) => Err(anyhow::anyhow!("row {} has non-integer quantity {}", row, v)),
            })
            .collect();
    }

    let values = column.cast(&DataType::String)?;
    values
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text
                .parse::<i64>()
                .map(Some)
                .with_context(|| format!("row {} has non-integer quantity '{}'", row, text)),
        })
        .collect()
}
