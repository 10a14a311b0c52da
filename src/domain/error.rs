//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the management API contract.
/// These are independent of transport concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("response is missing field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' is not a string")]
    NotAString { field: String },
}
