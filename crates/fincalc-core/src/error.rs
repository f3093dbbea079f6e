use rust_decimal::Decimal;
use thiserror::Error;

use crate::FinCalcResult;

/// The only failure an engine reports: a precondition on its inputs was violated.
///
/// Degenerate-but-valid inputs (zero interest, zero discount rate, a real
/// return at or below zero) are not errors. They take a formula fallback and
/// surface a warning in the output envelope instead. Inputs whose projected
/// figures leave Decimal's range are rejected the same way, never by panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },
}

impl FinCalcError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FinCalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// An intermediate figure driven by `field` left Decimal's range
    /// (about ±7.9e28).
    pub fn out_of_range(field: impl Into<String>) -> Self {
        FinCalcError::invalid(field, "Result exceeds representable range")
    }

    /// Name of the offending input field.
    pub fn field(&self) -> &str {
        match self {
            FinCalcError::InvalidInput { field, .. } => field,
        }
    }

    /// Same reason, attributed to the caller's input field.
    pub fn for_field(self, field: impl Into<String>) -> Self {
        match self {
            FinCalcError::InvalidInput { reason, .. } => FinCalcError::InvalidInput {
                field: field.into(),
                reason,
            },
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            FinCalcError::InvalidInput { reason, .. } => reason,
        }
    }
}

/// Lift a `checked_*` Decimal result, reporting overflow against `field`.
pub fn in_range(value: Option<Decimal>, field: &str) -> FinCalcResult<Decimal> {
    value.ok_or_else(|| FinCalcError::out_of_range(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_in_range_reports_field() {
        assert_eq!(in_range(Some(dec!(2)), "principal").unwrap(), dec!(2));

        let err = in_range(Decimal::MAX.checked_mul(dec!(2)), "principal").unwrap_err();
        assert_eq!(err.field(), "principal");
        assert!(err.reason().contains("representable range"));
    }

    #[test]
    fn test_for_field_keeps_reason() {
        let err = FinCalcError::out_of_range("rate").for_field("inflation_pct");
        assert_eq!(err.field(), "inflation_pct");
        assert_eq!(err.reason(), "Result exceeds representable range");
    }
}
