//! Error types for SqlPipe

use thiserror::Error;

/// The main error type for SqlPipe operations
///
/// Building and rendering a clause chain never fails. These variants come
/// from generating modification statements, executing SQL, or reading rows.
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A modification statement could not be generated from its inputs
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// A row was asked for a column it does not carry
    #[error("Column '{column}' not found in result row")]
    ColumnNotFound { column: String },

    /// A column value could not be converted to the requested type
    #[error("Column '{column}' holds {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The executor backend cannot perform the requested operation
    #[error("Unsupported by this executor: {feature}")]
    Unsupported { feature: String },

    /// Opaque failure reported by an executor implementation
    #[error("Executor error: {message}")]
    Executor { message: String },
}

/// Convenience Result type for SqlPipe operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new column not found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Create a new type mismatch error
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            found,
        }
    }

    /// Create a new unsupported operation error
    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    /// Create a new executor error
    pub fn executor(message: impl Into<String>) -> Self {
        Self::Executor {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_query_error() {
        let err = Error::invalid_query("INSERT requires at least one source column");
        assert!(matches!(err, Error::InvalidQuery { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid query: INSERT requires at least one source column"
        );
    }

    #[test]
    fn test_column_not_found_error() {
        let err = Error::column_not_found("FULL_NAME");
        assert!(matches!(err, Error::ColumnNotFound { .. }));
        assert_eq!(err.to_string(), "Column 'FULL_NAME' not found in result row");
    }

    #[test]
    fn test_type_mismatch_error() {
        let err = Error::type_mismatch("AGE", "INTEGER", "TEXT");
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(err.to_string(), "Column 'AGE' holds TEXT, expected INTEGER");
    }

    #[test]
    fn test_unsupported_error() {
        let err = Error::unsupported("stored procedures");
        assert_eq!(
            err.to_string(),
            "Unsupported by this executor: stored procedures"
        );
    }

    #[test]
    fn test_executor_error() {
        let err = Error::executor("connection refused");
        assert!(matches!(err, Error::Executor { .. }));
        assert_eq!(err.to_string(), "Executor error: connection refused");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
