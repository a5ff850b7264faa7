//! Admission and dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! request handlers
//!     → queue.rs: try_send into a bounded mpsc (never waits;
//!       Rejected(full) when at capacity)
//!     → orchestrator.rs: the single consumer drains FIFO and runs
//!       idempotency check → route → processor call → persist
//!     → oneshot reply back to the submitter with the terminal outcome
//! ```

pub mod orchestrator;
pub mod queue;

pub use orchestrator::Orchestrator;
pub use queue::{channel, DispatchJob, DispatchOutcome, DispatchQueue};
