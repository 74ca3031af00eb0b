//! Pipeline module - the CLTV stages and their orchestration

pub mod aggregate;
pub mod clean;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod normalize;
pub mod run;
pub mod segment;
pub mod transaction;

pub use aggregate::*;
pub use clean::*;
pub use error::*;
pub use loader::*;
pub use metrics::*;
pub use normalize::*;
pub use run::*;
pub use segment::*;
pub use transaction::*;
