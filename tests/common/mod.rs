//! Shared utilities for integration testing: scriptable mock payment
//! processors and a fully wired gateway stack on ephemeral ports.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use payment_gateway::config::GatewayConfig;
use payment_gateway::dispatch::{self, DispatchQueue, Orchestrator};
use payment_gateway::health::{HealthMonitor, HealthView};
use payment_gateway::lifecycle::Shutdown;
use payment_gateway::processors::ProcessorClient;
use payment_gateway::routing::RoutingPolicy;
use payment_gateway::storage::InMemoryPaymentStore;
use payment_gateway::summary::SummaryAggregator;

/// A mock payment processor instance serving the health and payment
/// endpoints with scriptable behavior.
#[derive(Clone)]
pub struct MockProcessor {
    pub addr: SocketAddr,
    failing: Arc<AtomicBool>,
    min_response_time_ms: Arc<AtomicU64>,
    pay_status: Arc<AtomicU16>,
    pay_delay_ms: Arc<AtomicU64>,
    pay_calls: Arc<AtomicU32>,
    health_calls: Arc<AtomicU32>,
    pay_bodies: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockProcessor {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_min_response_time_ms(&self, ms: u64) {
        self.min_response_time_ms.store(ms, Ordering::SeqCst);
    }

    pub fn set_pay_status(&self, status: u16) {
        self.pay_status.store(status, Ordering::SeqCst);
    }

    pub fn set_pay_delay_ms(&self, ms: u64) {
        self.pay_delay_ms.store(ms, Ordering::SeqCst);
    }

    pub fn pay_calls(&self) -> u32 {
        self.pay_calls.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> u32 {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Correlation ids of the payments received, in arrival order.
    pub fn paid_correlation_ids(&self) -> Vec<String> {
        self.pay_bodies
            .lock()
            .unwrap()
            .iter()
            .filter_map(|body| {
                let value: serde_json::Value = serde_json::from_str(body).ok()?;
                Some(value.get("correlationId")?.as_str()?.to_string())
            })
            .collect()
    }
}

/// Start a mock processor on an ephemeral port. Healthy and fast unless
/// scripted otherwise.
pub async fn start_mock_processor() -> MockProcessor {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mock = MockProcessor {
        addr: listener.local_addr().unwrap(),
        failing: Arc::new(AtomicBool::new(false)),
        min_response_time_ms: Arc::new(AtomicU64::new(10)),
        pay_status: Arc::new(AtomicU16::new(200)),
        pay_delay_ms: Arc::new(AtomicU64::new(0)),
        pay_calls: Arc::new(AtomicU32::new(0)),
        health_calls: Arc::new(AtomicU32::new(0)),
        pay_bodies: Arc::new(Mutex::new(Vec::new())),
    };

    let server = mock.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let server = server.clone();
                    tokio::spawn(async move {
                        server.handle(socket).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    mock
}

impl MockProcessor {
    async fn handle(&self, mut socket: TcpStream) {
        let Some((head, request_body)) = read_request(&mut socket).await else {
            return;
        };

        let (status_line, body) = if head.starts_with("GET") && head.contains("/payments/service-health")
        {
            self.health_calls.fetch_add(1, Ordering::SeqCst);
            let body = format!(
                "{{\"failing\":{},\"minResponseTime\":{}}}",
                self.failing.load(Ordering::SeqCst),
                self.min_response_time_ms.load(Ordering::SeqCst)
            );
            ("200 OK", body)
        } else {
            self.pay_calls.fetch_add(1, Ordering::SeqCst);
            self.pay_bodies.lock().unwrap().push(request_body);
            let delay = self.pay_delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            match self.pay_status.load(Ordering::SeqCst) {
                200 => ("200 OK", "{\"message\":\"payment processed successfully\"}".to_string()),
                422 => ("422 Unprocessable Entity", "{}".to_string()),
                500 => ("500 Internal Server Error", "{}".to_string()),
                _ => ("503 Service Unavailable", "{}".to_string()),
            }
        };

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }
}

/// Read the request head and the full body (per Content-Length) so the
/// client never sees a reset while still writing.
async fn read_request(socket: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);

            let mut body = buf[pos + 4..].to_vec();
            while body.len() < content_length {
                let n = socket.read(&mut chunk).await.ok()?;
                if n == 0 {
                    break;
                }
                body.extend_from_slice(&chunk[..n]);
            }
            return Some((head, String::from_utf8_lossy(&body).to_string()));
        }

        if buf.len() > 64 * 1024 {
            return None;
        }
    }
}

/// A fully wired gateway stack: probe loops, bounded queue and the
/// dispatch consumer, all on the real component types.
#[allow(dead_code)]
pub struct TestGateway {
    pub queue: DispatchQueue,
    pub store: Arc<InMemoryPaymentStore>,
    pub aggregator: SummaryAggregator,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
pub async fn start_gateway(
    default: &MockProcessor,
    fallback: &MockProcessor,
    queue_capacity: usize,
) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.processors.default_url = default.base_url();
    config.processors.fallback_url = fallback.base_url();
    config.timeouts.connect_secs = 1;
    config.timeouts.request_secs = 2;
    config.health_check.interval_secs = 1;
    config.health_check.timeout_secs = 1;
    config.queue.capacity = queue_capacity;

    let store = Arc::new(InMemoryPaymentStore::new());
    let health = Arc::new(HealthView::new());
    let client = ProcessorClient::new(&config).unwrap();
    let shutdown = Shutdown::new();

    HealthMonitor::new(health.clone(), client.clone(), config.health_check.clone())
        .spawn(&shutdown);

    let (queue, jobs) = dispatch::channel(config.queue.capacity);
    let orchestrator = Orchestrator::new(
        store.clone(),
        client,
        health,
        RoutingPolicy::new(config.routing.latency_threshold_ms),
    );
    tokio::spawn(orchestrator.run(jobs, shutdown.subscribe()));

    TestGateway {
        queue,
        store: store.clone(),
        aggregator: SummaryAggregator::new(store),
        shutdown,
    }
}

/// Wait until every mock has served at least one health probe, so the
/// gateway routes on real snapshots rather than the unknown sentinel.
#[allow(dead_code)]
pub async fn wait_for_first_probe(mocks: &[&MockProcessor]) {
    for _ in 0..200 {
        if mocks.iter().all(|mock| mock.health_calls() >= 1) {
            // The snapshot is published right after the probe response.
            tokio::time::sleep(Duration::from_millis(50)).await;
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("mock processors were never probed");
}
