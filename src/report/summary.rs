//! CLTV run summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{CltvReport, CustomerCltv, Segment};

/// Summary of a CLTV run, including per-step timings
#[derive(Debug, Default)]
pub struct CltvSummary {
    pub input_rows: usize,
    pub kept_rows: usize,
    pub dropped_cancelled: usize,
    pub dropped_non_positive: usize,
    pub dropped_negative_price: usize,
    pub dropped_missing: usize,
    pub customers: usize,
    pub repeat_rate: f64,
    pub churn_rate: f64,
    pub segment_counts: Vec<(Segment, usize)>,
    pub load_time: Option<Duration>,
    pub scoring_time: Option<Duration>,
    pub save_time: Option<Duration>,
}

impl CltvSummary {
    pub fn from_report(report: &CltvReport) -> Self {
        Self {
            input_rows: report.cleaning.input_rows,
            kept_rows: report.cleaning.kept_rows,
            dropped_cancelled: report.cleaning.dropped_cancelled,
            dropped_non_positive: report.cleaning.dropped_non_positive,
            dropped_negative_price: report.cleaning.dropped_negative_price,
            dropped_missing: report.cleaning.dropped_missing,
            customers: report.rates.customer_count,
            repeat_rate: report.rates.repeat_rate,
            churn_rate: report.rates.churn_rate,
            segment_counts: report.segment_counts(),
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = Some(elapsed);
    }

    pub fn set_scoring_time(&mut self, elapsed: Duration) {
        self.scoring_time = Some(elapsed);
    }

    pub fn set_save_time(&mut self, elapsed: Duration) {
        self.save_time = Some(elapsed);
    }

    /// Build the summary table
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Input Rows"), Cell::new(self.input_rows)]);

        for (label, count) in [
            ("🗑️  Dropped (Cancelled)", self.dropped_cancelled),
            ("🗑️  Dropped (Quantity ≤ 0)", self.dropped_non_positive),
            ("🗑️  Dropped (Price < 0)", self.dropped_negative_price),
            ("🗑️  Dropped (Missing)", self.dropped_missing),
        ] {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(count).fg(if count == 0 { Color::White } else { Color::Red }),
            ]);
        }

        table.add_row(vec![Cell::new("✅ Rows Scored"), Cell::new(self.kept_rows)]);
        table.add_row(vec![
            Cell::new("👥 Customers"),
            Cell::new(self.customers)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("🔁 Repeat Rate"),
            Cell::new(format!("{:.3}", self.repeat_rate)),
        ]);
        table.add_row(vec![
            Cell::new("📉 Churn Rate"),
            Cell::new(format!("{:.3}", self.churn_rate)).fg(Color::Yellow),
        ]);

        for (segment, count) in &self.segment_counts {
            table.add_row(vec![
                Cell::new(format!("🏷️  Segment {}", segment)),
                Cell::new(count).fg(segment_color(*segment)),
            ]);
        }

        let timings = [
            ("⏱️  Load", self.load_time),
            ("⏱️  Scoring", self.scoring_time),
            ("⏱️  Save", self.save_time),
        ];
        for (label, elapsed) in timings {
            if let Some(elapsed) = elapsed {
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(format!("{:.2}s", elapsed.as_secs_f64())),
                ]);
            }
        }

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CLTV SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }
    }
}

fn segment_color(segment: Segment) -> Color {
    match segment {
        Segment::A => Color::Green,
        Segment::B => Color::Cyan,
        Segment::C => Color::Yellow,
        Segment::D => Color::Red,
    }
}

/// Table of the first `limit` customers (rows are expected in report order)
pub fn top_customers_table(customers: &[CustomerCltv], limit: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        [
            "Customer",
            "Invoices",
            "Units",
            "Revenue",
            "CLTV",
            "Scaled",
            "Segment",
        ]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect::<Vec<_>>(),
    );

    for c in customers.iter().take(limit) {
        table.add_row(vec![
            Cell::new(&c.customer_id),
            Cell::new(c.total_transactions).set_alignment(CellAlignment::Right),
            Cell::new(c.total_units).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", c.total_revenue)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", c.cltv)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", c.scaled_cltv)).set_alignment(CellAlignment::Right),
            Cell::new(c.segment).fg(segment_color(c.segment)),
        ]);
    }

    table
}

/// Print the top customers by scaled CLTV
pub fn display_top_customers(customers: &[CustomerCltv], limit: usize) {
    if limit == 0 || customers.is_empty() {
        return;
    }

    println!();
    println!(
        "    {} {}",
        style("🏆").cyan(),
        style(format!("TOP {} CUSTOMERS", limit.min(customers.len()))).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    for line in top_customers_table(customers, limit).to_string().lines() {
        println!("    {}", line);
    }
}
