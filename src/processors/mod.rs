//! Outbound adapter for the external payment processors.

pub mod client;

pub use client::{ProcessorClient, ProcessorError, ServiceHealth};
