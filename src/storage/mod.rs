//! Persistence interface consumed by the dispatch path.
//!
//! The gateway core only speaks this trait; the backing engine is a
//! collaborator. The bundled implementation is an in-memory concurrent
//! map (memory.rs).

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{PaymentRecord, ProcessorId, ProcessorSummary};

pub use memory::InMemoryPaymentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert-time backstop for the correlation-id uniqueness invariant.
    #[error("a payment record with correlation id {0} already exists")]
    DuplicateCorrelationId(Uuid),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Whether a record with this correlation id has been written.
    async fn exists(&self, correlation_id: Uuid) -> Result<bool, StoreError>;

    /// Write one settled payment. Rejects duplicate correlation ids.
    async fn save(&self, record: PaymentRecord) -> Result<(), StoreError>;

    /// Count and amount-sum for one processor over an optional inclusive
    /// `[from, to]` window. A `None` bound leaves that side open.
    async fn aggregate(
        &self,
        processor: ProcessorId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<ProcessorSummary, StoreError>;
}
