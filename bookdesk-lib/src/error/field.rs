//! FieldError for row field access

/// Error type for reading or writing a book field by column name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// No column has this accessor name.
    #[error("Unknown field '{field}'")]
    Unknown { field: String },

    /// The value cannot be stored in the field.
    #[error("Field '{field}' rejects '{value}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },
}

impl FieldError {
    /// Creates a new unknown field error.
    pub fn unknown(field: impl Into<String>) -> Self {
        Self::Unknown {
            field: field.into(),
        }
    }

    /// Creates a new invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected,
        }
    }
}
