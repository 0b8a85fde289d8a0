//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorCategory};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("cannot write output {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Output { .. } => crate::exitcode::CANTCREAT,
            CliError::Application(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                ApplicationError::Compile { .. } | ApplicationError::Domain(_) => {
                    match e.domain_error() {
                        Some(DomainError::FileNotFound(_)) => crate::exitcode::NOINPUT,
                        _ => match e.category() {
                            Some(ErrorCategory::Syntax | ErrorCategory::Resolution) => {
                                crate::exitcode::DATAERR
                            }
                            _ => crate::exitcode::SOFTWARE,
                        },
                    }
                }
            },
        }
    }
}
