use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use luffy_link::config::CONFIG;
use luffy_link::link::UdpLink;
use luffy_link::link_server::LinkServer;
use luffy_link::mav_bridge::MavlinkBridge;
use luffy_link::protocol::DeviceId;
use luffy_link::util::setup_logging;
use luffy_link::web_server::WebServer;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging(&CONFIG.log_level);
    info!("Application starting...");

    let settings = &CONFIG.link;
    info!(
        "Link {} on {}, peer {} at {}",
        settings.device, settings.bind, settings.peer_device, settings.peer
    );

    // Create a shutdown signal channel
    let (shutdown_tx, _) = broadcast::channel(1);

    let link = Arc::new(
        UdpLink::bind(settings.device, settings.bind)
            .await?
            .with_peer(settings.peer),
    );

    // The autopilot's own heartbeat replaces ours when the bridge runs
    let bridge_enabled = CONFIG.mavlink.enabled && settings.device != DeviceId::Gcs;
    let heartbeat_interval = (!bridge_enabled && settings.heartbeat_interval_ms > 0)
        .then(|| Duration::from_millis(settings.heartbeat_interval_ms));

    let link_server = LinkServer::new(Arc::clone(&link), settings.peer_device, heartbeat_interval);
    let latest = link_server.latest();
    let link_handle = spawn_link_server(link_server, shutdown_tx.subscribe()).await;

    let bridge_handle = if bridge_enabled {
        info!("Starting MAVLink bridge...");
        let bridge = MavlinkBridge::new(
            CONFIG.mavlink.connection_string.clone(),
            Arc::clone(&link),
            settings.peer_device,
        );
        spawn_mavlink_bridge(bridge, shutdown_tx.subscribe()).await
    } else {
        info!("MAVLink bridge disabled in config, skipping...");
        tokio::spawn(async {})
    };

    let web_handle = if CONFIG.web.enabled {
        let web_server = WebServer::new(
            CONFIG.web.host.clone(),
            CONFIG.web.port,
            link.stats(),
            latest,
        );
        spawn_web_server(web_server, shutdown_tx.subscribe()).await
    } else {
        info!("Web server disabled in config, skipping...");
        tokio::spawn(async {})
    };

    let shutdown_signal = async {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping services...");
                if shutdown_tx.send(()).is_err() {
                    error!("No services left to stop");
                }
            }
            Err(err) => {
                error!("Failed to listen for shutdown signal: {}", err);
            }
        }
    };

    let results = tokio::join!(link_handle, bridge_handle, web_handle, shutdown_signal);

    for (result, name) in [results.0, results.1, results.2]
        .into_iter()
        .zip(["Link server", "MAVLink bridge", "Web server"])
    {
        if let Err(e) = result {
            error!("{} join error: {}", name, e);
        }
    }

    info!("Final link stats: {:?}", link.stats().snapshot());
    info!("All services stopped, shutting down");

    Ok(())
}

async fn spawn_link_server(
    server: LinkServer,
    mut shutdown: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = server.start() => {
                if let Err(e) = result {
                    error!("Link server error: {:#}", e);
                }
            }
            _ = shutdown.recv() => {
                info!("Shutting down link server...");
                server.stop().await;
            }
        }
    })
}

async fn spawn_mavlink_bridge(
    bridge: MavlinkBridge,
    mut shutdown: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = bridge.start() => {
                if let Err(e) = result {
                    error!("MAVLink bridge error: {:#}", e);
                }
            }
            _ = shutdown.recv() => {
                info!("Shutting down MAVLink bridge...");
                bridge.stop().await;
            }
        }
    })
}

async fn spawn_web_server(
    server: WebServer,
    mut shutdown: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = server.start() => {
                if let Err(e) = result {
                    error!("Web server error: {:#}", e);
                }
            }
            _ = shutdown.recv() => {
                info!("Shutting down web server...");
                server.stop().await;
            }
        }
    })
}
