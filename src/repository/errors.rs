use thiserror::Error;

/// Errors returned by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A connection could not be checked out of the pool.
    #[error("connection error: {0}")]
    ConnectionError(String),
    /// The underlying query failed.
    #[error("database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    /// A document body could not be encoded or decoded.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// Stored data violates a domain constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(value: diesel::r2d2::PoolError) -> Self {
        Self::ConnectionError(value.to_string())
    }
}

/// Convenient alias for results returned from repositories.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
