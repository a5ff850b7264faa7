//! Read-only aggregation over persisted payments.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{PaymentsSummary, ProcessorId};
use crate::storage::{PaymentStore, StoreError};

/// Computes per-processor totals over an optional inclusive window.
///
/// Imposes no locking of its own; consistency is whatever the store
/// provides.
#[derive(Clone)]
pub struct SummaryAggregator {
    store: Arc<dyn PaymentStore>,
}

impl SummaryAggregator {
    pub fn new(store: Arc<dyn PaymentStore>) -> Self {
        Self { store }
    }

    /// Both processors are always reported; one with no matching records
    /// contributes zeroes rather than being absent.
    pub async fn summarize(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<PaymentsSummary, StoreError> {
        let default = self
            .store
            .aggregate(ProcessorId::Default, from, to)
            .await?;
        let fallback = self
            .store
            .aggregate(ProcessorId::Fallback, from, to)
            .await?;

        Ok(PaymentsSummary { default, fallback })
    }
}
