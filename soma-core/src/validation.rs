//! Validation error types

use thiserror::Error;

/// Validation error for request parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value is not one of the accepted variants
    #[error("invalid {field} value: '{value}' (expected one of: {expected})")]
    InvalidVariant {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Value could not be parsed at all (e.g. `limit=abc`)
    #[error("invalid query parameters: {reason}")]
    Malformed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::InvalidVariant {
            field: "variant",
            value: "C".into(),
            expected: "A, B",
        };
        assert_eq!(
            err.to_string(),
            "invalid variant value: 'C' (expected one of: A, B)"
        );
    }
}
