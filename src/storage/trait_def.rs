use crate::models::{NewVisit, VisitEvent};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write visit event: {0}")]
    Write(anyhow::Error),
    #[error("failed to read visit events: {0}")]
    Read(anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Append-only log of visit events. Write-once-read-many: historical
/// events are never corrected, so no update or delete is exposed.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Initialize the storage (create the schema if absent)
    async fn init(&self) -> Result<()>;

    /// Durably persist a visit and return its assigned id.
    ///
    /// Ids are assigned by the store, monotonically increasing, and never
    /// reused. A failed append is reported once and the event is dropped;
    /// the store does not queue or retry internally.
    async fn append(&self, visit: &NewVisit) -> StoreResult<i64>;

    /// All events with `timestamp >= threshold_millis`, in no guaranteed
    /// order, from a single logical snapshot of the log.
    async fn query_since(&self, threshold_millis: i64) -> StoreResult<Vec<VisitEvent>>;
}
