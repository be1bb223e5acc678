//! Error types for the WARDEN access-control subsystem.
//!
//! All fallible operations return `AclResult<T>`. `NotFound` is the only
//! variant callers are expected to recover from routinely: the facade turns
//! it into an empty, unpersisted `AccessControl`.

use thiserror::Error;

/// The unified error type for WARDEN.
#[derive(Debug, Error)]
pub enum AclError {
    /// No record matched the lookup, or a lookalike record was rejected.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// The caller supplied a value that can never be valid, such as an
    /// unknown mode name.
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// A record's type discriminator did not match the expected model.
    #[error("expected a '{expected}' record, found '{found}'")]
    UnexpectedModel { expected: String, found: String },

    /// The persistence collaborator failed. Propagated unchanged; WARDEN
    /// performs no retries.
    #[error("persistence error: {reason}")]
    Persistence { reason: String },

    /// A record could not be converted to or from its stored shape.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The change journal could not append an entry.
    #[error("journal write failed: {reason}")]
    JournalWriteFailed { reason: String },
}

impl AclError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Shorthand for a `Validation` error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for a `Persistence` error.
    pub fn persistence(reason: impl Into<String>) -> Self {
        Self::Persistence {
            reason: reason.into(),
        }
    }

    /// Return true for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for AclError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            reason: e.to_string(),
        }
    }
}

/// Convenience alias used throughout the WARDEN crates.
pub type AclResult<T> = Result<T, AclError>;
