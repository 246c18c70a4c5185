use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    /// Dataset failed to load or is absent. Carries the recorded load diagnostic.
    DataUnavailable(String),
    /// An expected column could not be resolved against the table headers.
    SchemaError(String),
    /// Caller-supplied value violates a stated constraint.
    InvalidArgument(String),
    /// Structural precondition violated (e.g. export with no data loaded).
    ValidationError(String),
    ParseError(String),
    IoError(String),
}

impl AppError {
    /// Status code the transport layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidArgument(_)
            | AppError::SchemaError(_)
            | AppError::ValidationError(_) => 400,
            AppError::DataUnavailable(_) => 503,
            AppError::ParseError(_) | AppError::IoError(_) => 500,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        self.status_code() == 400
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DataUnavailable(msg) => write!(f, "Data unavailable: {}", msg),
            AppError::SchemaError(msg) => write!(f, "Schema error: {}", msg),
            AppError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidArgument("x".into()).status_code(), 400);
        assert_eq!(AppError::SchemaError("x".into()).status_code(), 400);
        assert_eq!(AppError::ValidationError("x".into()).status_code(), 400);
        assert_eq!(AppError::DataUnavailable("x".into()).status_code(), 503);
        assert_eq!(AppError::IoError("x".into()).status_code(), 500);
        assert!(!AppError::DataUnavailable("x".into()).is_client_fault());
    }

    #[test]
    fn test_display_includes_message() {
        let err = AppError::SchemaError("column 'codigo' not found".into());
        assert_eq!(err.to_string(), "Schema error: column 'codigo' not found");
    }
}
