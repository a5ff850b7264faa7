//! HTTP protocol boundary.

pub mod server;

pub use server::{router, serve, AppState};
