//! Ingestion sink trait and error types

use crate::catalog::CourseDetailsRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while delivering a record
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink rejected record with HTTP {status}")]
    Rejected { status: u16 },

    #[error("Sink rejected the worker key")]
    Unauthorized,

    #[error("Failed to reach sink: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl SinkError {
    /// Authorization failures are never worth retrying
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for harvested records
///
/// Implementations must upsert idempotently on `global_id`: delivering the
/// same record twice replaces the first copy. The crawler relies on this and
/// makes no exactly-once promise.
#[async_trait]
pub trait IngestionSink: Send + Sync {
    /// Delivers one record
    async fn submit(&self, record: &CourseDetailsRecord) -> SinkResult<()>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
