//! Active processor health monitoring.
//!
//! # Responsibilities
//! - Periodically probe each processor's health endpoint
//! - Publish successful probe results into the shared [`HealthView`]
//! - Absorb probe failures: keep the previous snapshot, keep polling

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::HealthCheckConfig;
use crate::domain::ProcessorId;
use crate::health::snapshot::{HealthView, ProcessorHealth};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::processors::ProcessorClient;

/// Owns the writing side of the health snapshots.
///
/// Runs one independent probe loop per processor so a slow DEFAULT probe
/// never delays the FALLBACK probe. The loops never touch the request
/// path; dispatch only sees the snapshots.
pub struct HealthMonitor {
    view: Arc<HealthView>,
    client: ProcessorClient,
    config: HealthCheckConfig,
}

impl HealthMonitor {
    pub fn new(view: Arc<HealthView>, client: ProcessorClient, config: HealthCheckConfig) -> Self {
        Self {
            view,
            client,
            config,
        }
    }

    /// Spawn both probe loops. Each runs until the shutdown signal.
    pub fn spawn(self, shutdown: &Shutdown) -> Vec<JoinHandle<()>> {
        tracing::info!(
            interval_secs = self.config.interval_secs,
            timeout_secs = self.config.timeout_secs,
            "health monitor starting"
        );

        ProcessorId::ALL
            .into_iter()
            .map(|id| {
                tokio::spawn(probe_loop(
                    id,
                    self.view.clone(),
                    self.client.clone(),
                    Duration::from_secs(self.config.interval_secs),
                    shutdown.subscribe(),
                ))
            })
            .collect()
    }
}

async fn probe_loop(
    id: ProcessorId,
    view: Arc<HealthView>,
    client: ProcessorClient,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    // The first tick completes immediately, so a snapshot is available
    // shortly after startup rather than one interval in.
    let mut ticker = time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                probe_once(id, &view, &client).await;
            }
            _ = shutdown.recv() => {
                tracing::debug!(processor = %id, "health probe loop stopping");
                break;
            }
        }
    }
}

async fn probe_once(id: ProcessorId, view: &HealthView, client: &ProcessorClient) {
    match client.probe_health(id).await {
        Ok(health) => {
            tracing::debug!(
                processor = %id,
                failing = health.failing,
                min_response_time_ms = health.min_response_time,
                "health snapshot updated"
            );
            metrics::record_processor_health(id.as_str(), health.failing, health.min_response_time);
            view.publish(
                id,
                ProcessorHealth::Probed {
                    failing: health.failing,
                    min_response_time_ms: health.min_response_time,
                },
            );
        }
        Err(error) => {
            // Stale but usable: the previous snapshot stays in place and
            // the next scheduled probe proceeds.
            tracing::warn!(processor = %id, error = %error, "health probe failed");
            metrics::record_probe_failure(id.as_str());
        }
    }
}
