//! Single-consumer dispatch loop.
//!
//! # Responsibilities
//! - Drain the admission queue strictly FIFO, one request at a time
//! - Run the per-request sequence: idempotency check → route →
//!   processor call → persist
//! - Deliver each terminal outcome to the submitter
//!
//! Keeping a single consumer caps in-flight processor calls at one and
//! gives a stable invocation order; each request is fully resolved
//! before the next is taken.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};

use crate::domain::{PaymentRecord, PaymentRequest, ProcessorId};
use crate::error::GatewayError;
use crate::dispatch::queue::{DispatchJob, DispatchOutcome};
use crate::health::HealthView;
use crate::observability::metrics;
use crate::processors::ProcessorClient;
use crate::routing::RoutingPolicy;
use crate::storage::PaymentStore;

pub struct Orchestrator {
    store: Arc<dyn PaymentStore>,
    client: ProcessorClient,
    health: Arc<HealthView>,
    policy: RoutingPolicy,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        client: ProcessorClient,
        health: Arc<HealthView>,
        policy: RoutingPolicy,
    ) -> Self {
        Self {
            store,
            client,
            health,
            policy,
        }
    }

    /// Consume jobs until shutdown or until every producer is gone.
    pub async fn run(
        self,
        mut jobs: mpsc::Receiver<DispatchJob>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!("dispatch loop starting");

        loop {
            tokio::select! {
                job = jobs.recv() => {
                    let Some(job) = job else { break };
                    let outcome = self.dispatch(&job.request).await;
                    self.observe(&job.request, &outcome);
                    if job.reply.send(outcome).is_err() {
                        tracing::debug!(
                            correlation_id = %job.request.correlation_id,
                            "submitter went away before the outcome was ready"
                        );
                    }
                }
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!("dispatch loop stopped");
    }

    async fn dispatch(&self, request: &PaymentRequest) -> DispatchOutcome {
        if self.store.exists(request.correlation_id).await? {
            return Err(GatewayError::DuplicatePayment(request.correlation_id));
        }

        let default = self.health.snapshot(ProcessorId::Default);
        let fallback = self.health.snapshot(ProcessorId::Fallback);
        let Some(processor) = self.policy.select(&default, &fallback) else {
            return Err(GatewayError::ProcessorUnavailable);
        };

        // Terminal for this attempt: no automatic retry or re-queue, so
        // a degraded processor cannot trap the consumer in a loop.
        if let Err(error) = self.client.pay(processor, request).await {
            tracing::warn!(
                correlation_id = %request.correlation_id,
                processor = %processor,
                error = %error,
                "processor call failed"
            );
            return Err(GatewayError::ProcessorUnavailable);
        }

        let record = PaymentRecord {
            correlation_id: request.correlation_id,
            amount: request.amount,
            created_at: Utc::now(),
            processor,
        };
        if let Err(source) = self.store.save(record).await {
            // The external charge went through; this is a different class
            // of failure than anything above and gets its own channel.
            tracing::error!(
                target: "payment_gateway::consistency",
                correlation_id = %request.correlation_id,
                processor = %processor,
                error = %source,
                "payment settled but the record write failed"
            );
            metrics::record_persistence_inconsistency();
            return Err(GatewayError::PersistenceInconsistency {
                correlation_id: request.correlation_id,
                processor,
                source,
            });
        }

        Ok(processor)
    }

    fn observe(&self, request: &PaymentRequest, outcome: &DispatchOutcome) {
        match outcome {
            Ok(processor) => {
                tracing::debug!(
                    correlation_id = %request.correlation_id,
                    processor = %processor,
                    "payment settled"
                );
                metrics::record_payment(processor.as_str(), "settled");
            }
            Err(error) => {
                metrics::record_payment("none", error.label());
            }
        }
    }
}
