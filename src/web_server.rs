use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, info};

use crate::link::{LinkStats, LinkStatsSnapshot};
use crate::link_server::LatestMessages;
use crate::protocol::Envelope;

#[derive(Clone)]
struct AppState {
    stats: Arc<LinkStats>,
    latest: Arc<LatestMessages>,
}

pub struct WebServer {
    host: String,
    port: u16,
    state: AppState,
    running: Arc<AtomicBool>,
}

async fn link_stats(State(state): State<AppState>) -> Json<LinkStatsSnapshot> {
    Json(state.stats.snapshot())
}

async fn latest_messages(State(state): State<AppState>) -> Result<Json<Vec<Envelope>>, StatusCode> {
    state.latest.snapshot().map(Json).map_err(|e| {
        error!("Failed to read latest messages: {:#}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn shutdown_signal(running: Arc<AtomicBool>) {
    while running.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

pub fn router(stats: Arc<LinkStats>, latest: Arc<LatestMessages>) -> Router {
    Router::new()
        .route("/api/link/stats", get(link_stats))
        .route("/api/link/messages", get(latest_messages))
        .with_state(AppState { stats, latest })
}

impl WebServer {
    pub fn new(
        host: String,
        port: u16,
        stats: Arc<LinkStats>,
        latest: Arc<LatestMessages>,
    ) -> Self {
        Self {
            host,
            port,
            state: AppState { stats, latest },
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        let app = router(
            Arc::clone(&self.state.stats),
            Arc::clone(&self.state.latest),
        );

        self.running.store(true, Ordering::SeqCst);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;
        info!("Serving link status on http://{}/api/link", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(Arc::clone(&self.running)))
            .await
            .context("Failed to serve")?;
        Ok(())
    }

    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::Heartbeat;
    use crate::protocol::{DeviceId, FrameError};

    fn test_state() -> AppState {
        AppState {
            stats: Arc::new(LinkStats::default()),
            latest: Arc::new(LatestMessages::default()),
        }
    }

    #[tokio::test]
    async fn test_stats_endpoint() -> Result<()> {
        let state = test_state();
        state.stats.record_sent();
        state
            .stats
            .record_dropped(&FrameError::UnknownDevice(9).into());

        let Json(snapshot) = link_stats(State(state.clone())).await;
        assert_eq!(snapshot.sent, 1);
        assert_eq!(snapshot.unknown_device, 1);

        let value = serde_json::to_value(snapshot)?;
        assert_eq!(value["unknown_device"], 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_messages_endpoint_json_shape() -> Result<()> {
        let state = test_state();
        state.latest.record(&Envelope {
            source: DeviceId::Uav,
            target: DeviceId::Gcs,
            message: Heartbeat {
                timestamp: 1000,
                armed: true,
                mode: 4,
                system_status: 1,
                online: true,
            }
            .into(),
        })?;

        let Ok(Json(envelopes)) = latest_messages(State(state)).await else {
            panic!("Expected latest messages");
        };
        let value = serde_json::to_value(envelopes)?;
        assert_eq!(value[0]["source"], "uav");
        assert_eq!(value[0]["target"], "gcs");
        assert_eq!(value[0]["message"]["type"], "Heartbeat");
        assert_eq!(value[0]["message"]["data"]["systemStatus"], 1);
        assert_eq!(value[0]["message"]["data"]["armed"], true);
        Ok(())
    }
}
