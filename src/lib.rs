//! Payment intermediation gateway.
//!
//! Sits between clients and two unreliable external payment processor
//! instances (DEFAULT primary, FALLBACK secondary) and guarantees each
//! payment settles at most once while absorbing bursts and degraded
//! processors.
//!
//! # Architecture Overview
//!
//! ```text
//! POST /payments ──▶ http ──▶ dispatch queue (bounded, try_send)
//!                                  │
//!                                  ▼ single consumer, strict FIFO
//!                            orchestrator:
//!                              exists? ──▶ routing policy ──▶ pay ──▶ save
//!                                  ▲              ▲
//!                                  │              │ lock-free snapshots
//!                               storage       health view
//!                                                 ▲
//!                          two periodic probe loops (health monitor)
//!
//! GET /payments-summary ──▶ summary aggregator ──▶ storage
//! ```

// Core subsystems
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod http;

// Traffic management
pub mod health;
pub mod processors;
pub mod routing;

// Collaborators & cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod storage;
pub mod summary;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use lifecycle::Shutdown;
