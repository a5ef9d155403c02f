//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or registry assembly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The invocation path is not a valid relative path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// The base URL is invalid or cannot be joined with a path.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Two cases in a registry share the same name.
    #[error("duplicate case name: {0}")]
    DuplicateCase(String),

    /// A case depends on a case that is not registered before it.
    #[error("case '{case}' depends on unknown or later case '{dependency}'")]
    UnknownDependency {
        /// The dependent case.
        case: String,
        /// The missing prerequisite.
        dependency: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
