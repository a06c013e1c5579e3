//! Error types for the core crate.
//!
//! Dimension validation is the only fallible operation here: a dimension set
//! that would place features outside the envelope, or on top of each other,
//! is rejected before any geometry is built.

use thiserror::Error;

/// Errors raised while validating a [`DimensionSet`](crate::DimensionSet).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DimensionError {
    /// A length that must be strictly positive is zero or negative.
    #[error("Parameter '{name}' must be positive (got {value})")]
    NotPositive { name: String, value: f64 },

    /// A count that must be at least `min` is smaller.
    #[error("Parameter '{name}' must be at least {min} (got {value})")]
    CountTooSmall {
        name: String,
        value: usize,
        min: usize,
    },

    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Two adjacent features would overlap.
    #[error("Features overlap: {0}")]
    Overlap(String),

    /// A derived feature falls outside the outer envelope.
    #[error("Feature outside envelope: {0}")]
    OutsideEnvelope(String),
}

impl DimensionError {
    pub(crate) fn not_positive(name: &str, value: f64) -> Self {
        Self::NotPositive {
            name: name.to_string(),
            value,
        }
    }

    pub(crate) fn out_of_range(name: &str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        }
    }
}

/// Result type alias for dimension validation.
pub type DimensionResult<T> = Result<T, DimensionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_error_display() {
        let err = DimensionError::OutOfRange {
            name: "toggles.z".to_string(),
            value: -5.0,
            min: 0.0,
            max: 34.1,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'toggles.z' out of range: -5 (valid: 0..34.1)"
        );

        let err = DimensionError::not_positive("shell.wall_thickness", 0.0);
        assert_eq!(
            err.to_string(),
            "Parameter 'shell.wall_thickness' must be positive (got 0)"
        );

        let err = DimensionError::Overlap("toggle holes".to_string());
        assert_eq!(err.to_string(), "Features overlap: toggle holes");
    }

    #[test]
    fn test_count_error_display() {
        let err = DimensionError::CountTooSmall {
            name: "toggles.count".to_string(),
            value: 0,
            min: 1,
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'toggles.count' must be at least 1 (got 0)"
        );
    }
}
