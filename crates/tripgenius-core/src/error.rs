//! Error types shared by the domain and its ports.

use thiserror::Error;
use uuid::Uuid;

/// Rule violations and lookups that failed at the domain level.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Validation(String),

    /// The resource exists but belongs to another traveler.
    #[error("trip belongs to another user")]
    Forbidden,

    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("storage unavailable: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("record not found")]
    NotFound,

    /// Unique or foreign-key violation, e.g. a second account for one email.
    #[error("constraint violated: {0}")]
    Constraint(String),
}
