//! Error types for MusicXML translation
//!
//! Fatal errors only. Recoverable problems (unknown attribute values,
//! duration mismatches, out-of-range alterations) are reported through the
//! `Reporter` and never abort the translation.

use thiserror::Error;

/// Top-level translation error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// The document could not be read as partwise MusicXML
    #[error("XML parsing failed: {0}")]
    Parse(#[from] ParseError),

    /// A structural invariant was violated; translation of the document stops
    #[error("Internal translation error at line {line}: {message}")]
    Internal { line: usize, message: String },
}

impl TranslationError {
    pub fn internal(line: usize, message: impl Into<String>) -> Self {
        TranslationError::Internal {
            line,
            message: message.into(),
        }
    }

    /// Input line the error refers to, when known
    pub fn line(&self) -> Option<usize> {
        match self {
            TranslationError::Internal { line, .. } => Some(*line),
            TranslationError::Parse(_) => None,
        }
    }
}

/// Fatal XML parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// XML is malformed (not well-formed)
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// MusicXML format not supported (e.g., timewise instead of partwise)
    #[error("Unsupported MusicXML format: {0}")]
    UnsupportedFormat(String),

    /// Required structural element is missing
    #[error("Missing required element: {0}")]
    MissingRequiredElement(String),
}

pub type Result<T> = std::result::Result<T, TranslationError>;
