//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file,
//! and every field has a default so a minimal (or absent) config works.

use serde::{Deserialize, Serialize};

/// Root configuration for the payment gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Endpoints of the two payment processor instances.
    pub processors: ProcessorsConfig,

    /// Health probing settings.
    pub health_check: HealthCheckConfig,

    /// Processor selection settings.
    pub routing: RoutingConfig,

    /// Admission queue settings.
    pub queue: QueueConfig,

    /// Timeouts for outbound processor calls.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9999").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9999".to_string(),
        }
    }
}

/// Base URLs of the DEFAULT and FALLBACK processor instances.
///
/// The payment endpoint is `{base_url}/payments` and the health endpoint
/// `{base_url}/payments/service-health`. Both URLs can be overridden via
/// the `PROCESSOR_DEFAULT_URL` / `PROCESSOR_FALLBACK_URL` environment
/// variables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessorsConfig {
    pub default_url: String,
    pub fallback_url: String,
}

impl Default for ProcessorsConfig {
    fn default() -> Self {
        Self {
            default_url: "http://localhost:8001".to_string(),
            fallback_url: "http://localhost:8002".to_string(),
        }
    }
}

/// Health probing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Probe interval in seconds, per processor.
    pub interval_secs: u64,

    /// Probe timeout in seconds. A timed-out probe counts as a failed
    /// probe.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            timeout_secs: 5,
        }
    }
}

/// Processor selection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// DEFAULT is skipped when its advertised minimum response time
    /// exceeds this threshold.
    pub latency_threshold_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            latency_threshold_ms: 1000,
        }
    }
}

/// Admission queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of queued requests before admission is rejected.
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 20_000 }
    }
}

/// Timeouts for outbound payment calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 2,
            request_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
