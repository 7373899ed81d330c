//! Structured error handling for hanseg
//!
//! Every fallible operation in the crate returns [`SegError`]. Construction
//! failures, vocabulary problems and engine failures are surfaced to the
//! caller unchanged; nothing in the crate retries.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with SegError
pub type Result<T> = std::result::Result<T, SegError>;

/// Main error type for hanseg
#[derive(Error, Debug, Clone)]
pub enum SegError {
    /// Tokenizer could not be constructed (bad model path, invalid model file)
    #[error("Construction error in {component}: {message}")]
    Construction {
        message: String,
        component: String,
        path: Option<PathBuf>,
    },

    /// Custom vocabulary / user dictionary could not be loaded
    #[error("Vocabulary load error ({}): {message}", path.display())]
    VocabLoad {
        message: String,
        path: PathBuf,
    },

    /// Traditional-to-simplified conversion was requested but no table is loaded
    #[error("Script conversion unavailable: {message}")]
    ConversionUnavailable {
        message: String,
    },

    /// Failure reported by the wrapped segmentation engine
    #[error("Engine error in {engine} ({operation}): {message}")]
    Engine {
        engine: String,
        operation: TextOperation,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Internal/bug errors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        location: Option<String>,
    },
}

impl SegError {
    /// Shorthand for an engine failure
    pub fn engine(
        engine: impl Into<String>,
        operation: TextOperation,
        message: impl Into<String>,
    ) -> Self {
        SegError::Engine {
            engine: engine.into(),
            operation,
            message: message.into(),
        }
    }

    /// Whether the error happened while building a tokenizer
    pub fn is_construction_failure(&self) -> bool {
        matches!(
            self,
            SegError::Construction { .. } | SegError::VocabLoad { .. }
        )
    }
}

/// Text operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOperation {
    Tokenization,
    Tagging,
}

impl fmt::Display for TextOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextOperation::Tokenization => write!(f, "tokenization"),
            TextOperation::Tagging => write!(f, "tagging"),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for SegError {
    fn from(err: std::io::Error) -> Self {
        SegError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SegError::Config {
            message: "Unknown engine".to_string(),
            path: Some(PathBuf::from("hanseg.toml")),
        };
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Unknown engine"));
    }

    #[test]
    fn test_vocab_error_mentions_path() {
        let err = SegError::VocabLoad {
            message: "No such file".to_string(),
            path: PathBuf::from("dicts/user.txt"),
        };
        let text = err.to_string();
        assert!(text.contains("dicts/user.txt"));
        assert!(err.is_construction_failure());
    }

    #[test]
    fn test_text_operation_display() {
        assert_eq!(TextOperation::Tokenization.to_string(), "tokenization");
        let err = SegError::engine("lexicon", TextOperation::Tagging, "mode is seg");
        assert_eq!(err.to_string(), "Engine error in lexicon (tagging): mode is seg");
        assert!(!err.is_construction_failure());
    }
}
