//! Error handling for the assistant core
//!
//! User-visible conditions (unrecognized command, missing slots, unknown
//! employee) are never errors: they surface as `CommandResult` failures with
//! suggestions attached. The types here cover the remaining failure modes:
//! collaborator breakage and broken invariants.

use thiserror::Error;

/// Main error type for the assistant pipeline
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Speech synthesis error: {message}")]
    Speech { message: String },

    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Invalid intent reached dispatcher: {reason}")]
    InvalidIntent { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the data-access collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {entity} #{id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Transaction failed: {message}")]
    Transaction { message: String },

    #[error("Storage backend error: {message}")]
    Backend { message: String },
}

/// Errors loading or validating the keyword lexicon
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Failed to parse lexicon: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read lexicon file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lexicon is missing required table '{table}'")]
    MissingTable { table: String },
}

/// Result type aliases for convenience
pub type AssistantResult<T> = Result<T, AssistantError>;
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_propagates_into_assistant_error() {
        let err = StoreError::Backend {
            message: "connection refused".to_string(),
        };
        let wrapped = AssistantError::from(err);
        assert!(matches!(wrapped, AssistantError::Store(_)));
        assert!(wrapped.to_string().contains("connection refused"));
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound {
            entity: "employee",
            id: 42,
        };
        assert_eq!(err.to_string(), "Record not found: employee #42");
    }
}
