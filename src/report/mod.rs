//! Report module - output table, JSON export and terminal summary

pub mod cltv_export;
pub mod customer_table;
pub mod summary;

pub use cltv_export::*;
pub use customer_table::*;
pub use summary::*;
