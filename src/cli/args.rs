//! Command-line argument definitions using clap

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::pipeline::{ColumnMapping, PipelineConfig, DEFAULT_CANCELLATION_MARKER};

/// cltv - Score customers by lifetime value and split them into A-D segments
#[derive(Parser, Debug)]
#[command(name = "cltv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input transactions file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to input directory with '_cltv' suffix (e.g., retail.csv → retail_cltv.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON analysis export path.
    /// Defaults to input directory with '_cltv_analysis.json' suffix.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Skip writing the JSON analysis export
    #[arg(long, default_value = "false")]
    pub no_export: bool,

    /// Column holding the invoice identifier
    #[arg(long, default_value = "Invoice")]
    pub invoice_column: String,

    /// Column holding the customer identifier
    #[arg(long, default_value = "Customer ID")]
    pub customer_column: String,

    /// Column holding the line quantity
    #[arg(long, default_value = "Quantity")]
    pub quantity_column: String,

    /// Column holding the unit price
    #[arg(long, default_value = "Price")]
    pub price_column: String,

    /// Invoice ids containing this text are treated as cancellations and dropped
    #[arg(long, default_value = DEFAULT_CANCELLATION_MARKER, value_parser = validate_cancellation_marker)]
    pub cancellation_marker: String,

    /// Number of top customers to print after scoring (0 disables)
    #[arg(long, default_value = "5")]
    pub top: usize,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Get the output path, deriving from input if not explicitly provided.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| derived_path(&self.input, "_cltv", None))
    }

    /// Get the JSON export path, or None when export is disabled.
    pub fn json_export_path(&self) -> Option<PathBuf> {
        if self.no_export {
            return None;
        }
        Some(
            self.json
                .clone()
                .unwrap_or_else(|| derived_path(&self.input, "_cltv_analysis", Some("json"))),
        )
    }

    /// Pipeline settings taken from the flags
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            columns: ColumnMapping {
                invoice: self.invoice_column.clone(),
                customer: self.customer_column.clone(),
                quantity: self.quantity_column.clone(),
                price: self.price_column.clone(),
            },
            cancellation_marker: self.cancellation_marker.clone(),
        }
    }
}

/// Sibling of `input` named `<stem><suffix>.<extension>`; the extension
/// defaults to the input's own (or csv).
fn derived_path(input: &Path, suffix: &str, extension: Option<&str>) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let extension = extension.unwrap_or_else(|| {
        input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv")
    });
    parent.join(format!("{}{}.{}", stem, suffix, extension))
}

/// Validator for cancellation_marker parameter
fn validate_cancellation_marker(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cancellation_marker must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
