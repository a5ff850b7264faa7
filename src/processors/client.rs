//! Outbound HTTP adapter for the two payment processor instances.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::domain::{PaymentRequest, ProcessorId};

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("failed to construct the processor http client")]
    Build(#[from] reqwest::Error),

    #[error("{processor} processor base URL is invalid")]
    InvalidBaseUrl {
        processor: ProcessorId,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level failure, including timeouts.
    #[error("request to the {processor} processor failed")]
    Transport {
        processor: ProcessorId,
        #[source]
        source: reqwest::Error,
    },

    #[error("the {processor} processor answered {status}")]
    Status {
        processor: ProcessorId,
        status: reqwest::StatusCode,
    },

    #[error("the {processor} processor health payload was malformed")]
    MalformedHealth {
        processor: ProcessorId,
        #[source]
        source: reqwest::Error,
    },
}

/// Health endpoint payload, as served by the processors.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub failing: bool,
    pub min_response_time: u64,
}

/// Payment endpoint body. `requested_at` is stamped at call time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessorPaymentBody {
    correlation_id: Uuid,
    amount: Decimal,
    requested_at: DateTime<Utc>,
}

struct Endpoints {
    payments: Url,
    health: Url,
}

/// HTTP client over both processors. Payment calls carry the configured
/// request timeout, probes their own probe timeout; cloning shares the
/// underlying connection pool.
#[derive(Clone)]
pub struct ProcessorClient {
    http: reqwest::Client,
    probe_timeout: Duration,
    default: std::sync::Arc<Endpoints>,
    fallback: std::sync::Arc<Endpoints>,
}

impl ProcessorClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, ProcessorError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()?;

        Ok(Self {
            http,
            probe_timeout: Duration::from_secs(config.health_check.timeout_secs),
            default: std::sync::Arc::new(endpoints(
                ProcessorId::Default,
                &config.processors.default_url,
            )?),
            fallback: std::sync::Arc::new(endpoints(
                ProcessorId::Fallback,
                &config.processors.fallback_url,
            )?),
        })
    }

    /// One health probe. Any failure shape (transport, timeout, non-2xx,
    /// malformed body) is an error for the caller to absorb.
    pub async fn probe_health(&self, id: ProcessorId) -> Result<ServiceHealth, ProcessorError> {
        let response = self
            .http
            .get(self.endpoints(id).health.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|source| ProcessorError::Transport {
                processor: id,
                source,
            })?;

        if !response.status().is_success() {
            return Err(ProcessorError::Status {
                processor: id,
                status: response.status(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| ProcessorError::MalformedHealth {
                processor: id,
                source,
            })
    }

    /// Send one payment to the chosen processor. Success iff 2xx.
    pub async fn pay(&self, id: ProcessorId, request: &PaymentRequest) -> Result<(), ProcessorError> {
        let body = ProcessorPaymentBody {
            correlation_id: request.correlation_id,
            amount: request.amount,
            requested_at: Utc::now(),
        };

        let response = self
            .http
            .post(self.endpoints(id).payments.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| ProcessorError::Transport {
                processor: id,
                source,
            })?;

        if !response.status().is_success() {
            return Err(ProcessorError::Status {
                processor: id,
                status: response.status(),
            });
        }

        Ok(())
    }

    fn endpoints(&self, id: ProcessorId) -> &Endpoints {
        match id {
            ProcessorId::Default => &self.default,
            ProcessorId::Fallback => &self.fallback,
        }
    }
}

fn endpoints(id: ProcessorId, base_url: &str) -> Result<Endpoints, ProcessorError> {
    let join = |path: &str| -> Result<Url, ProcessorError> {
        let base = Url::parse(base_url).map_err(|source| ProcessorError::InvalidBaseUrl {
            processor: id,
            source,
        })?;
        base.join(path).map_err(|source| ProcessorError::InvalidBaseUrl {
            processor: id,
            source,
        })
    };

    Ok(Endpoints {
        payments: join("/payments")?,
        health: join("/payments/service-health")?,
    })
}
