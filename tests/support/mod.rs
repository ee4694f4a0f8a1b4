#![allow(dead_code)]

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tracks how many stub requests are in flight at once.
#[derive(Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Serves `app` on an ephemeral localhost port, returning the bound address.
pub async fn spawn_app(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub app");
    });
    addr
}

/// Stub backend for pool tests.
///
/// `POST /sleep` holds the request for `{"ms": n}` milliseconds before
/// echoing its payload back, `POST /mark` appends `{"seq": n}` to the arrival
/// log, and `GET /boom` always answers 500.
pub fn stub_app(gauge: Arc<ConcurrencyGauge>, arrivals: Arc<Mutex<Vec<u64>>>) -> Router {
    let sleep_gauge = gauge.clone();
    Router::new()
        .route(
            "/sleep",
            post(move |Json(body): Json<Value>| {
                let gauge = sleep_gauge.clone();
                async move {
                    gauge.enter();
                    let ms = body.get("ms").and_then(Value::as_u64).unwrap_or(0);
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    gauge.exit();
                    Json(body)
                }
            }),
        )
        .route(
            "/mark",
            post(move |Json(body): Json<Value>| {
                let arrivals = arrivals.clone();
                async move {
                    let seq = body.get("seq").and_then(Value::as_u64).unwrap_or(0);
                    arrivals.lock().expect("arrival log lock").push(seq);
                    Json(body)
                }
            }),
        )
        .route("/boom", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "kaboom") }))
}

/// Spawns the stub backend and hands back its address plus the probes.
pub async fn spawn_stub() -> (SocketAddr, Arc<ConcurrencyGauge>, Arc<Mutex<Vec<u64>>>) {
    let gauge = Arc::new(ConcurrencyGauge::default());
    let arrivals = Arc::new(Mutex::new(Vec::new()));
    let addr = spawn_app(stub_app(gauge.clone(), arrivals.clone())).await;
    (addr, gauge, arrivals)
}

/// An address nothing listens on, for connection-failure tests.
pub async fn dead_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe listener");
    let addr = listener.local_addr().expect("probe listener address");
    drop(listener);
    addr
}
