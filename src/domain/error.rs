//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors cover everything that can go wrong while classifying,
/// building or rendering a template tree. All of them are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    // syntax
    #[error("unknown directive: {0}")]
    UnknownDirective(String),

    #[error("argument is missing in '{directive}' directive")]
    MissingArgument { directive: &'static str },

    #[error("wrong name format in '{directive}' directive: {name}")]
    InvalidName {
        directive: &'static str,
        name: String,
    },

    #[error("unterminated quote ({quote}) in line")]
    UnterminatedQuote { quote: char },

    #[error("unterminated attribute list in tag '{tag}'")]
    UnterminatedAttributes { tag: String },

    // resolution
    #[error("unable to find file {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("name {0} not found")]
    NameNotFound(String),

    #[error("name {name} registered twice, first definition: {first}")]
    DuplicateName { name: String, first: String },

    // structural
    #[error("max depth reached ({0}), change --max-depth param")]
    MaxDepthExceeded(usize),

    #[error("unable to add a child at depth {0}")]
    OrphanNode(usize),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse error category, used to pick exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Resolution,
    Structural,
}

impl DomainError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::UnknownDirective(_)
            | DomainError::MissingArgument { .. }
            | DomainError::InvalidName { .. }
            | DomainError::UnterminatedQuote { .. }
            | DomainError::UnterminatedAttributes { .. } => ErrorCategory::Syntax,
            DomainError::FileNotFound(_)
            | DomainError::NameNotFound(_)
            | DomainError::DuplicateName { .. } => ErrorCategory::Resolution,
            DomainError::MaxDepthExceeded(_)
            | DomainError::OrphanNode(_)
            | DomainError::Internal(_) => ErrorCategory::Structural,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
