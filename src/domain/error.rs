//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations in the imported chart data.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no data found, the file appears to be empty")]
    NoData,

    /// Aggregated per-row validation report, one violation per line.
    #[error("{report}")]
    Shape { report: String },

    #[error("parent cost center with id '{0}' does not exist in the file")]
    MissingParent(String),

    #[error("cycle detected in parent chain involving '{0}'")]
    CycleDetected(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
