//! Errors
//!
//! Every fallible operation in the crate returns [`ModelError`]. The variants
//! are usage errors: they are raised at the point of violation and never
//! retried internally.
//!
//! - **InvalidConfiguration**: the model cannot be built or a text cannot be
//!   scored (text not longer than the context window, zero dimensions, bad
//!   learning rate, malformed config JSON).
//! - **InvalidInput**: a context string of the wrong length was passed to
//!   single-step prediction.
//! - **InvalidIndex**: a vocabulary index outside `[0, vocab_size)` was decoded.
//! - **UnknownSymbol**: a character that never appeared in the training text.
//! - **Io**: the training log file could not be written.

use std::fmt;

/// Convenience alias used throughout the crate
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors produced while building, training or querying a model
#[derive(Debug)]
pub enum ModelError {
    /// The model configuration or training text cannot produce a model.
    InvalidConfiguration(String),

    /// A context string had the wrong number of characters.
    InvalidInput {
        /// Number of characters the model's context window requires.
        expected: usize,
        /// Number of characters that were supplied.
        actual: usize,
    },

    /// A vocabulary index is out of range.
    InvalidIndex(usize),

    /// A character is not part of the vocabulary.
    UnknownSymbol(char),

    /// I/O error while writing the training log.
    Io(std::io::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidConfiguration(m) => write!(f, "invalid configuration: {m}"),
            ModelError::InvalidInput { expected, actual } => write!(
                f,
                "invalid input: context must be exactly {expected} characters, got {actual}"
            ),
            ModelError::InvalidIndex(id) => write!(f, "invalid vocabulary index {id}"),
            ModelError::UnknownSymbol(ch) => write!(f, "unknown symbol {ch:?}"),
            ModelError::Io(e) => write!(f, "training log io: {e}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self {
        ModelError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_input_display() {
        let e = ModelError::InvalidInput {
            expected: 3,
            actual: 2,
        };
        let s = e.to_string();
        assert!(s.contains("exactly 3"));
        assert!(s.contains("got 2"));
        assert!(e.source().is_none());
    }

    #[test]
    fn test_unknown_symbol_display() {
        let e = ModelError::UnknownSymbol('z');
        assert!(e.to_string().contains("'z'"));
    }

    #[test]
    fn test_io_error_has_source() {
        let e = ModelError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        assert!(matches!(e, ModelError::Io(_)));
        assert!(e.source().is_some());
        assert!(e.to_string().contains("read-only"));
    }
}
