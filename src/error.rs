// =============================================================================
// Analytics Errors
// =============================================================================
//
// Only the yield/inflation calculators and forecast validation raise errors.
// Every other calculation fails soft and returns an empty or neutral value.

use thiserror::Error;

/// Errors raised by the calculation core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("field '{field}' must be a finite number")]
    NonFiniteValue { field: &'static str },

    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("field '{field}' cannot be empty")]
    EmptyField { field: &'static str },

    #[error("unknown inflation type '{value}', expected one of cpi, ppi, pce")]
    UnknownInflationKind { value: String },

    #[error("invalid keyword pattern '{keyword}': {reason}")]
    KeywordPattern { keyword: String, reason: String },
}

impl AnalyticsError {
    /// Reject NaN and infinities for the named field.
    pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFiniteValue { field })
        }
    }
}
