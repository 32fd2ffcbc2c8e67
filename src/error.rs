// 🚫 Error taxonomy
// Everything that can go wrong happens before the engine runs (form parsing)
// or after it (asking for a memo without an analysis). The engine itself is total.

use thiserror::Error;

// ============================================================================
// INPUT ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Numeric form field could not be parsed
    #[error("{field}: '{value}' is not a valid number")]
    InvalidNumber { field: &'static str, value: String },

    /// Numeric form field parsed but is below zero
    #[error("{field}: '{value}' must not be negative")]
    Negative { field: &'static str, value: String },

    /// Amount times the share count exceeds what a Decimal can hold
    #[error("{field}: '{value}' is too large for the number of shares")]
    OutOfRange { field: &'static str, value: String },

    /// Required categorical field is empty or not one of the known values
    #[error("{field}: a value is required")]
    MissingField { field: &'static str },
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            InputError::InvalidNumber { field, .. } => field,
            InputError::Negative { field, .. } => field,
            InputError::OutOfRange { field, .. } => field,
            InputError::MissingField { field } => field,
        }
    }
}

// ============================================================================
// ANALYSIS ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A memo was requested before the transaction was evaluated
    #[error("no analysis available: evaluate the transaction before formatting a memo")]
    NotAnalyzed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_field() {
        let err = InputError::InvalidNumber {
            field: "transactionPrice",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "transactionPrice: 'abc' is not a valid number");
        assert_eq!(err.field(), "transactionPrice");

        let err = InputError::MissingField { field: "sellerType" };
        assert_eq!(err.field(), "sellerType");
    }
}
