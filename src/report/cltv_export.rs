//! CLTV analysis export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    CleaningStats, CltvReport, ColumnMapping, ColumnStats, CustomerCltv, PopulationRates,
    PROFIT_MARGIN_RATE, SEGMENT_COUNT,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// cltv-segments version
    pub version: String,
    /// Input file path
    pub input_file: String,
    /// Source column names
    pub columns: ColumnMapping,
    /// Substring marking cancelled invoices
    pub cancellation_marker: String,
    pub profit_margin_rate: f64,
    pub segment_count: usize,
}

/// Count of customers in one segment
#[derive(Serialize)]
pub struct SegmentCount {
    pub segment: String,
    pub customers: usize,
}

/// Complete CLTV analysis export with metadata
#[derive(Serialize)]
pub struct CltvAnalysisExport<'a> {
    pub metadata: AnalysisMetadata,
    pub rates: PopulationRates,
    pub cleaning: CleaningStats,
    /// Whether every CLTV was equal and scaling used the fallback constant
    pub scale_degenerate: bool,
    pub warnings: Vec<String>,
    pub summary: Vec<ColumnStats>,
    pub segments: Vec<SegmentCount>,
    /// Per-customer rows, highest scaled CLTV first
    pub customers: &'a [CustomerCltv],
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub columns: &'a ColumnMapping,
    pub cancellation_marker: &'a str,
}

/// Assemble the export document for a report
pub fn build_export<'a>(report: &'a CltvReport, params: &ExportParams) -> CltvAnalysisExport<'a> {
    CltvAnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            columns: params.columns.clone(),
            cancellation_marker: params.cancellation_marker.to_string(),
            profit_margin_rate: PROFIT_MARGIN_RATE,
            segment_count: SEGMENT_COUNT,
        },
        rates: report.rates,
        cleaning: report.cleaning,
        scale_degenerate: report.scale_degenerate,
        warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
        summary: report.population_summary(),
        segments: report
            .segment_counts()
            .into_iter()
            .map(|(segment, customers)| SegmentCount {
                segment: segment.to_string(),
                customers,
            })
            .collect(),
        customers: &report.customers,
    }
}

/// Export the CLTV analysis to a pretty-printed JSON file
pub fn export_cltv_analysis(
    report: &CltvReport,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_export(report, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize CLTV analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write CLTV analysis to {}", output_path.display()))?;

    Ok(())
}
