use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payment_gateway::config::{apply_env_overrides, load_config, GatewayConfig};
use payment_gateway::dispatch::{self, Orchestrator};
use payment_gateway::health::{HealthMonitor, HealthView};
use payment_gateway::http::{self, AppState};
use payment_gateway::lifecycle::Shutdown;
use payment_gateway::observability::metrics;
use payment_gateway::processors::ProcessorClient;
use payment_gateway::routing::RoutingPolicy;
use payment_gateway::storage::{InMemoryPaymentStore, PaymentStore};
use payment_gateway::summary::SummaryAggregator;

#[derive(Debug, Parser)]
#[command(name = "payment-gateway", about = "Payment intermediation gateway")]
struct Args {
    /// Path to a TOML configuration file; defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    apply_env_overrides(&mut config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("payment_gateway={}", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        default_url = %config.processors.default_url,
        fallback_url = %config.processors.fallback_url,
        queue_capacity = config.queue.capacity,
        latency_threshold_ms = config.routing.latency_threshold_ms,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(error) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                %error,
                "failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let store = Arc::new(InMemoryPaymentStore::new());
    let health = Arc::new(HealthView::new());
    let client = ProcessorClient::new(&config)?;

    HealthMonitor::new(health.clone(), client.clone(), config.health_check.clone())
        .spawn(&shutdown);

    let (queue, jobs) = dispatch::channel(config.queue.capacity);
    let orchestrator = Orchestrator::new(
        store.clone() as Arc<dyn PaymentStore>,
        client,
        health,
        RoutingPolicy::new(config.routing.latency_threshold_ms),
    );
    tokio::spawn(orchestrator.run(jobs, shutdown.subscribe()));

    let state = AppState {
        queue,
        aggregator: SummaryAggregator::new(store),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // Ctrl+C fans out to the probe loops, the dispatch consumer and the
    // HTTP server through the shutdown channel.
    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            ctrl_c_shutdown.trigger();
        }
    });

    http::serve(listener, state, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
