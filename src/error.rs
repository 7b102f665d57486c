//! Pipeline error types.
//!
//! Screening is fail-closed: any schema, vocabulary, or type problem aborts
//! the whole batch rather than skipping rows. These variants are the typed
//! surface; the binary wraps them with `anyhow` context at the top level.

use thiserror::Error;

/// Errors raised while transforming or scoring an uploaded table.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// A column the active pipeline mode requires is absent.
    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// A categorical value has no code in the encoder vocabulary.
    /// Unknown values are never default-encoded.
    #[error("unknown category '{value}' for column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// A numeric column holds a value that does not parse as a number.
    #[error("non-numeric value '{value}' in column '{column}' (row {row})")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// No encoder was loaded for a column the pipeline must encode.
    #[error("no encoder loaded for column '{column}'")]
    MissingEncoder { column: String },

    /// The uploaded table has headers but no data rows.
    #[error("table contains no rows")]
    EmptyTable,

    /// The classifier returned a label count that does not match the input.
    #[error("classifier returned {got} labels for {expected} rows")]
    LabelCountMismatch { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = ScreenError::MissingColumn {
            column: "Attendance".to_string(),
        };
        assert_eq!(err.to_string(), "missing required column 'Attendance'");

        let err = ScreenError::UnknownCategory {
            column: "Spent_On".to_string(),
            value: "Crypto".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown category 'Crypto' for column 'Spent_On'"
        );

        let err = ScreenError::NonNumeric {
            column: "Attendance".to_string(),
            row: 3,
            value: "ninety".to_string(),
        };
        assert!(err.to_string().contains("row 3"));
    }
}
