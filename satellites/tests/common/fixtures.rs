//! In-process mock satellites
//!
//! Each [`MockSatellite`] serves `GET /spans_received` from an axum router
//! on an ephemeral port, with a counter the test bumps directly.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU16, Ordering};
use tokio::task::JoinHandle;

use shared::PortSet;

#[derive(Clone, Default)]
struct SatelliteState {
    received: Arc<AtomicI64>,
    /// 0 means answer normally
    forced_status: Arc<AtomicU16>,
}

async fn spans_received(State(state): State<SatelliteState>) -> (StatusCode, String) {
    match state.forced_status.load(Ordering::SeqCst) {
        0 => (StatusCode::OK, state.received.load(Ordering::SeqCst).to_string()),
        code => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "forced failure".to_string(),
        ),
    }
}

pub struct MockSatellite {
    pub port: u16,
    state: SatelliteState,
    server: JoinHandle<()>,
}

impl MockSatellite {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let state = SatelliteState::default();
        let app = Router::new()
            .route("/spans_received", get(spans_received))
            .with_state(state.clone());

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { port, state, server }
    }

    /// Simulate `count` more spans arriving
    pub fn receive(&self, count: i64) {
        self.state.received.fetch_add(count, Ordering::SeqCst);
    }

    /// Make every following request answer with `status`
    pub fn fail_with(&self, status: u16) {
        self.state.forced_status.store(status, Ordering::SeqCst);
    }
}

impl Drop for MockSatellite {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub struct MockFleet {
    pub satellites: Vec<MockSatellite>,
}

impl MockFleet {
    pub async fn start(count: usize) -> Self {
        let mut satellites = Vec::with_capacity(count);
        for _ in 0..count {
            satellites.push(MockSatellite::start().await);
        }
        Self { satellites }
    }

    pub fn ports(&self) -> PortSet {
        PortSet::new(self.satellites.iter().map(|s| s.port).collect()).unwrap()
    }

    pub fn satellite(&self, index: usize) -> &MockSatellite {
        &self.satellites[index]
    }
}
