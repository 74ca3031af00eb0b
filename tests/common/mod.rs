//! Shared test utilities and fixture generators

#![allow(dead_code)]

use cltv::pipeline::RawTransaction;
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Online Retail style transactions covering every cleaning rule.
///
/// - `17850`: two invoices (536365 with two lines, 536366), a repeat customer
/// - `13047`: one invoice
/// - `12583`: one invoice plus a cancellation `C536379`
/// - `14527`: only a return (negative quantity), absent after cleaning
/// - one row with no customer id
pub fn create_retail_dataframe() -> DataFrame {
    df! {
        "Invoice" => ["536365", "536365", "536366", "536367", "536370", "C536379", "536380", "536381"],
        "StockCode" => ["85123A", "71053", "22633", "84406B", "22728", "D", "22960", "21730"],
        "Quantity" => [6i64, 6, 6, 8, 24, 1, -5, 12],
        "Price" => [2.55f64, 3.39, 1.85, 2.75, 3.75, 27.5, 4.25, 1.25],
        "Customer ID" => [Some(17850.0f64), Some(17850.0), Some(17850.0), Some(13047.0), Some(12583.0), Some(12583.0), Some(14527.0), None],
        "Country" => ["United Kingdom", "United Kingdom", "United Kingdom", "United Kingdom", "France", "France", "United Kingdom", "United Kingdom"],
    }
    .unwrap()
}

/// Three customers with revenue 100 over two invoices, 50 and 200 over one
pub fn create_three_customer_records() -> Vec<RawTransaction> {
    vec![
        RawTransaction::new("1001", "A", 5, 10.0),
        RawTransaction::new("1002", "A", 10, 5.0),
        RawTransaction::new("1003", "B", 2, 25.0),
        RawTransaction::new("1004", "C", 4, 50.0),
    ]
}

/// Random one- or two-invoice customers with varied spend
pub fn create_random_records(customers: usize, seed: u64) -> Vec<RawTransaction> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut records = Vec::new();
    let mut invoice = 500_000u64;

    for c in 0..customers {
        let invoices = if rng.gen_bool(0.6) { 1 } else { rng.gen_range(2..5) };
        for _ in 0..invoices {
            invoice += 1;
            for _ in 0..rng.gen_range(1..4) {
                records.push(RawTransaction::new(
                    &invoice.to_string(),
                    &format!("{}", 12000 + c),
                    rng.gen_range(1..50),
                    rng.gen_range(0.1..20.0),
                ));
            }
        }
    }

    // Noise that cleaning must remove
    records.push(RawTransaction::new("C999999", "12000", 3, 1.0));
    records.push(RawTransaction::new("999998", "12001", -2, 1.0));

    records
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("transactions.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("transactions.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats agree to within a small tolerance
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
