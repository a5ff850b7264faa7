//! Atomically replaceable health snapshots.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::domain::ProcessorId;

/// Most recently observed health state of a processor.
///
/// `Unknown` is the sentinel before the first successful probe. A failed
/// probe never produces a value here; the previous snapshot is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorHealth {
    Unknown,
    Probed {
        failing: bool,
        min_response_time_ms: u64,
    },
}

/// One snapshot slot per processor, readable without locking.
///
/// The monitor is the only writer; the dispatch path only reads. Each
/// publish wholly replaces the slot in a single atomic swap, so readers
/// always observe a complete snapshot, at worst one poll interval stale.
pub struct HealthView {
    default: ArcSwap<ProcessorHealth>,
    fallback: ArcSwap<ProcessorHealth>,
}

impl HealthView {
    pub fn new() -> Self {
        Self {
            default: ArcSwap::from_pointee(ProcessorHealth::Unknown),
            fallback: ArcSwap::from_pointee(ProcessorHealth::Unknown),
        }
    }

    /// Current snapshot for a processor. Lock-free, never blocks.
    pub fn snapshot(&self, id: ProcessorId) -> Arc<ProcessorHealth> {
        self.slot(id).load_full()
    }

    pub(crate) fn publish(&self, id: ProcessorId, health: ProcessorHealth) {
        self.slot(id).store(Arc::new(health));
    }

    fn slot(&self, id: ProcessorId) -> &ArcSwap<ProcessorHealth> {
        match id {
            ProcessorId::Default => &self.default,
            ProcessorId::Fallback => &self.fallback,
        }
    }
}

impl Default for HealthView {
    fn default() -> Self {
        Self::new()
    }
}
