//! Application-level errors (wraps domain errors)

use std::fmt;
use thiserror::Error;

use crate::domain::{DomainError, ErrorCategory};

/// Source position of a failing node, rendered as `path:line:depth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub line: usize,
    pub depth: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.depth)
    }
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{location}: error: {source}")]
    Compile {
        location: Location,
        #[source]
        source: DomainError,
    },

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Underlying domain error, if any.
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            ApplicationError::Compile { source, .. } => Some(source),
            ApplicationError::Domain(e) => Some(e),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        self.domain_error().map(DomainError::category)
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
