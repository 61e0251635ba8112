//! Error handling for the Hack VM translator
//!
//! This module defines the error taxonomy shared by all phases of
//! translation. Every error is fatal: the driver aborts the whole run
//! on the first one, and no partial output file is considered valid.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main translator error type covering all phases of translation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("Lexical error at {location}: {message}")]
    Lexical {
        location: SourceLocation,
        message: String,
    },

    #[error("Syntax error at {location}: {message}")]
    Syntax {
        location: SourceLocation,
        message: String,
    },

    #[error("Code generation error at {location}: {message}")]
    Codegen {
        location: SourceLocation,
        message: String,
    },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl TranslateError {
    /// Create a lexical error (unrecognized command keyword)
    pub fn lexical(message: impl Into<String>, location: &SourceLocation) -> Self {
        TranslateError::Lexical {
            location: location.clone(),
            message: message.into(),
        }
    }

    /// Create a syntax error (bad field count, segment, or integer)
    pub fn syntax(message: impl Into<String>, location: &SourceLocation) -> Self {
        TranslateError::Syntax {
            location: location.clone(),
            message: message.into(),
        }
    }

    /// Create a code generation error
    pub fn codegen(message: impl Into<String>, location: &SourceLocation) -> Self {
        TranslateError::Codegen {
            location: location.clone(),
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::Io {
            message: err.to_string(),
        }
    }
}
