//! Processor selection policy.
//!
//! Pure decision logic over the two current health snapshots. No I/O,
//! deterministic for a given pair of snapshots, re-evaluated for every
//! dispatch attempt.

use crate::domain::ProcessorId;
use crate::health::ProcessorHealth;

/// Selection rules:
/// 1. DEFAULT failing → prefer FALLBACK.
/// 2. DEFAULT min response time above the threshold → prefer FALLBACK.
/// 3. Otherwise → DEFAULT.
///
/// A FALLBACK that is itself failing, or that has never been probed,
/// cannot absorb the failover; `select` then reports no usable
/// processor. DEFAULT before its first probe is optimistically usable.
#[derive(Debug, Clone, Copy)]
pub struct RoutingPolicy {
    latency_threshold_ms: u64,
}

impl RoutingPolicy {
    pub fn new(latency_threshold_ms: u64) -> Self {
        Self {
            latency_threshold_ms,
        }
    }

    pub fn select(
        &self,
        default: &ProcessorHealth,
        fallback: &ProcessorHealth,
    ) -> Option<ProcessorId> {
        if self.default_usable(default) {
            return Some(ProcessorId::Default);
        }
        if fallback_usable(fallback) {
            return Some(ProcessorId::Fallback);
        }
        None
    }

    fn default_usable(&self, health: &ProcessorHealth) -> bool {
        match *health {
            ProcessorHealth::Unknown => true,
            ProcessorHealth::Probed {
                failing,
                min_response_time_ms,
            } => !failing && min_response_time_ms <= self.latency_threshold_ms,
        }
    }
}

// Only `failing` and `Unknown` disqualify the fallback; its latency is
// not consulted once the primary is already out.
fn fallback_usable(health: &ProcessorHealth) -> bool {
    matches!(health, ProcessorHealth::Probed { failing: false, .. })
}
