//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → semantic validation
//!     → environment overrides (processor URLs)
//!     → GatewayConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults so the gateway runs with no config file

pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{
    GatewayConfig, HealthCheckConfig, ListenerConfig, ObservabilityConfig, ProcessorsConfig,
    QueueConfig, RoutingConfig, TimeoutConfig,
};
