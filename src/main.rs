//! cltv: Customer Lifetime Value CLI Tool
//!
//! Loads a transactions file, scores every customer and writes the
//! segmented customer table.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use cltv::cli::Cli;
use cltv::pipeline::{load_transactions, run_pipeline, CltvError};
use cltv::report::{
    customers_to_dataframe, display_top_customers, export_cltv_analysis, save_customer_table,
    CltvSummary, ExportParams,
};
use cltv::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.pipeline_config();
    let output_path = cli.output_path();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&cli.input, &output_path, &config);

    // Step 1: Load transactions
    print_step_header(1, "Load Transactions");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading transactions...");
    let loaded = load_transactions(&cli.input, &config.columns, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Transactions loaded");

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", loaded.rows);
    println!("      Estimated memory: {:.2} MB", loaded.memory_mb);
    let load_elapsed = step_start.elapsed();
    print_step_time(load_elapsed);

    // Step 2: Clean, aggregate, derive, scale and segment
    print_step_header(2, "Score Customers");

    let step_start = Instant::now();
    let spinner = create_spinner("Computing customer lifetime value...");
    let report = match run_pipeline(&loaded.records, &config) {
        Ok(report) => report,
        Err(err) => {
            finish_with_warning(&spinner, "Scoring aborted");
            return Err(match err {
                CltvError::EmptyInput => anyhow::anyhow!(
                    "{}. Check the column names and cancellation marker against {}",
                    err,
                    cli.input.display()
                ),
                CltvError::DegenerateChurn { .. } => err.into(),
            });
        }
    };
    finish_with_success(&spinner, "Customers scored");

    let cleaning = &report.cleaning;
    if cleaning.dropped_rows() == 0 {
        print_info("No rows removed during cleaning");
    } else {
        print_count(
            "row(s) removed during cleaning",
            cleaning.dropped_rows(),
            Some(&format!(
                "({} cancelled, {} quantity ≤ 0, {} negative price, {} missing)",
                cleaning.dropped_cancelled,
                cleaning.dropped_non_positive,
                cleaning.dropped_negative_price,
                cleaning.dropped_missing
            )),
        );
    }
    print_count("customer(s) scored", report.rates.customer_count, None);

    if report.scale_degenerate {
        print_warning("All customers have the same CLTV; scaled CLTV set to 0 for everyone");
    }
    for warning in &report.warnings {
        print_warning(&warning.to_string());
    }
    let scoring_elapsed = step_start.elapsed();
    print_step_time(scoring_elapsed);

    // Step 3: Save output
    print_step_header(3, "Save Results");

    let step_start = Instant::now();
    let spinner = create_spinner("Writing customer table...");
    let mut df = customers_to_dataframe(&report.customers)?;
    save_customer_table(&mut df, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));

    if let Some(json_path) = cli.json_export_path() {
        let input_file = cli.input.display().to_string();
        let params = ExportParams {
            input_file: &input_file,
            columns: &config.columns,
            cancellation_marker: &config.cancellation_marker,
        };
        export_cltv_analysis(&report, &json_path, &params)?;
        print_success(&format!("Analysis exported to {}", json_path.display()));
    }
    let save_elapsed = step_start.elapsed();
    print_step_time(save_elapsed);

    let mut summary = CltvSummary::from_report(&report);
    summary.set_load_time(load_elapsed);
    summary.set_scoring_time(scoring_elapsed);
    summary.set_save_time(save_elapsed);
    summary.display();

    display_top_customers(&report.customers, cli.top);

    print_completion();

    Ok(())
}
