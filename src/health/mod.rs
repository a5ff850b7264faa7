//! Health monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Two periodic probe loops (monitor.rs), one per processor:
//!     GET {base}/payments/service-health (timeout-bounded)
//!     → success: atomically replace that processor's snapshot
//!     → failure: log, keep previous snapshot, wait for next tick
//!
//! Snapshot slots (snapshot.rs):
//!     arc-swap per processor, lock-free reads from the dispatch path
//! ```

pub mod monitor;
pub mod snapshot;

pub use monitor::HealthMonitor;
pub use snapshot::{HealthView, ProcessorHealth};
