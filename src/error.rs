use thiserror::Error;

use crate::config::ConfigError;

/// Validation failure for one batch of operations.
///
/// Every variant aborts the whole batch; no partial results are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unsupported operation '{value}' at position {position}")]
    UnsupportedOperation { value: String, position: usize },
    #[error("Invalid numeric field '{field}'{}", position_suffix(.position))]
    InvalidNumericField {
        field: String,
        position: Option<usize>,
    },
    #[error("Numeric field '{field}' out of range{}", position_suffix(.position))]
    NumericOverflow {
        field: String,
        position: Option<usize>,
    },
}

fn position_suffix(position: &Option<usize>) -> String {
    match position {
        Some(p) => format!(" at position {}", p),
        None => String::new(),
    }
}

impl TaxError {
    pub fn invalid_numeric(field: &str, position: usize) -> Self {
        TaxError::InvalidNumericField {
            field: field.to_string(),
            position: Some(position),
        }
    }

    pub fn overflow(field: &str, position: usize) -> Self {
        TaxError::NumericOverflow {
            field: field.to_string(),
            position: Some(position),
        }
    }
}

/// Failure of the line-oriented driver.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Rejected batch on line {line}: {source}")]
    Tax {
        line: usize,
        #[source]
        source: TaxError,
    },
}
