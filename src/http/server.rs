//! HTTP boundary: request validation and status mapping.
//!
//! # Responsibilities
//! - Expose `POST /payments` and `GET /payments-summary`
//! - Validate payloads before anything reaches the dispatch path
//! - Map terminal outcomes to HTTP statuses: settled → 201,
//!   duplicate → 409, unavailable/saturated → 503, inconsistency → 500

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::dispatch::DispatchQueue;
use crate::domain::PaymentRequest;
use crate::error::GatewayError;
use crate::observability::metrics;
use crate::summary::SummaryAggregator;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub queue: DispatchQueue,
    pub aggregator: SummaryAggregator,
}

#[derive(Debug, Serialize)]
struct PaymentResponse {
    status: &'static str,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

/// Build the router with all handlers and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/payments", post(submit_payment))
        .route("/payments-summary", get(payments_summary))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "http server starting");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("http server stopped");
    Ok(())
}

async fn submit_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Response {
    if request.amount <= Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "amount": "must be greater than zero" })),
        )
            .into_response();
    }

    tracing::debug!(
        correlation_id = %request.correlation_id,
        amount = %request.amount,
        "payment received"
    );

    let outcome = match state.queue.enqueue(request) {
        Ok(outcome) => outcome,
        Err(error) => {
            metrics::record_admission_rejected();
            return error_response(&error);
        }
    };

    match outcome.await {
        Ok(Ok(processor)) => (
            StatusCode::CREATED,
            Json(PaymentResponse {
                status: "SUCCESS",
                message: format!("payment processed via {processor} processor"),
            }),
        )
            .into_response(),
        Ok(Err(error)) => error_response(&error),
        // The dispatch loop dropped the reply without an outcome; only
        // possible while the gateway is shutting down.
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(PaymentResponse {
                status: "ERROR",
                message: "gateway is shutting down".into(),
            }),
        )
            .into_response(),
    }
}

async fn payments_summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Response {
    match state.aggregator.summarize(params.from, params.to).await {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => {
            tracing::error!(error = %error, "summary query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PaymentResponse {
                    status: "ERROR",
                    message: "failed to aggregate payments".into(),
                }),
            )
                .into_response()
        }
    }
}

fn error_response(error: &GatewayError) -> Response {
    let status = match error {
        GatewayError::DuplicatePayment(_) => StatusCode::CONFLICT,
        GatewayError::ProcessorUnavailable | GatewayError::QueueSaturated => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        GatewayError::PersistenceInconsistency { .. } | GatewayError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(PaymentResponse {
            status: "ERROR",
            message: error.to_string(),
        }),
    )
        .into_response()
}
