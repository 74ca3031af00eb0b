//! Error types for the CLTV pipeline.
//!
//! Only structural failures are errors. Degenerate inputs that have a defined
//! fallback (equal CLTV values, too few distinct scores) are reported as
//! values by the normalizer and segmenter instead.

use thiserror::Error;

/// Conditions that abort a pipeline run before any metric is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CltvError {
    /// No customer survived cleaning, so every population ratio is undefined.
    #[error("no data: cleaning left zero transactions with a customer to score")]
    EmptyInput,

    /// Every customer has more than one invoice, so churn rate is zero and the
    /// CLTV formula would divide by it.
    #[error(
        "churn rate is zero: all {customers} customer(s) are repeat customers, CLTV is undefined"
    )]
    DegenerateChurn {
        /// Number of customers in the population
        customers: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_descriptive() {
        assert!(CltvError::EmptyInput.to_string().contains("no data"));

        let msg = CltvError::DegenerateChurn { customers: 3 }.to_string();
        assert!(msg.contains("churn rate is zero"));
        assert!(msg.contains('3'));
    }
}
