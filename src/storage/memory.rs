//! In-memory payment store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{PaymentRecord, ProcessorId, ProcessorSummary};
use crate::storage::{PaymentStore, StoreError};

/// Concurrent-map-backed store, keyed by correlation id.
///
/// Safe for concurrent readers and writers; cloning shares the map.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    records: Arc<DashMap<Uuid, PaymentRecord>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn exists(&self, correlation_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.records.contains_key(&correlation_id))
    }

    async fn save(&self, record: PaymentRecord) -> Result<(), StoreError> {
        match self.records.entry(record.correlation_id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateCorrelationId(record.correlation_id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn aggregate(
        &self,
        processor: ProcessorId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<ProcessorSummary, StoreError> {
        let mut summary = ProcessorSummary::default();
        for entry in self.records.iter() {
            let record = entry.value();
            if record.processor != processor {
                continue;
            }
            if from.is_some_and(|from| record.created_at < from) {
                continue;
            }
            if to.is_some_and(|to| record.created_at > to) {
                continue;
            }
            summary.total_requests += 1;
            summary.total_amount += record.amount;
        }
        Ok(summary)
    }
}
