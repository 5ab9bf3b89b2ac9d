//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add orchestration-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error(
        "cannot import cost centers: {count} ledger entries with cost centers exist \
         for this company, pass --force to delete them"
    )]
    Conflict { count: usize },

    #[error("only CSV and Excel files can be used for importing data, got '.{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("spreadsheet decoding is not available, convert '{0}' to CSV first")]
    SpreadsheetUnavailable(PathBuf),

    #[error("an import for company '{company}' is already in progress")]
    ImportInProgress { company: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
