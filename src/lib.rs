//! cltv: Customer Lifetime Value Segmentation Library
//!
//! Cleans invoice-level retail transactions, aggregates them per customer,
//! derives CLTV metrics, scales them into [0, 1] and buckets customers into
//! quartile segments A-D.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
