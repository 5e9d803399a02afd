use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::link::UdpLink;
use crate::protocol::messages::{FlightMode, GcsHeartbeat, Heartbeat, SystemStatus};
use crate::protocol::{DeviceId, Direction, Envelope, Message, MessageType};
use crate::util;

const SUBSCRIBER_CAPACITY: usize = 256;

/// Most recent message of each type received from the peer.
#[derive(Debug, Default)]
pub struct LatestMessages {
    messages: RwLock<HashMap<MessageType, Envelope>>,
}

impl LatestMessages {
    pub fn record(&self, envelope: &Envelope) -> Result<()> {
        let mut messages = self
            .messages
            .write()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        messages.insert(envelope.message.message_type(), envelope.clone());
        Ok(())
    }

    /// Latest envelopes ordered by message type code.
    pub fn snapshot(&self) -> Result<Vec<Envelope>> {
        let messages = self
            .messages
            .read()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        let mut envelopes: Vec<Envelope> = messages.values().cloned().collect();
        envelopes.sort_by_key(|envelope| envelope.message.message_type().to_u16());
        Ok(envelopes)
    }
}

/// Receives frames from the link, hands decoded messages to subscribers and
/// keeps the peer informed with periodic heartbeats.
pub struct LinkServer {
    link: Arc<UdpLink>,
    peer_device: DeviceId,
    heartbeat_interval: Option<Duration>,
    messages: broadcast::Sender<Envelope>,
    latest: Arc<LatestMessages>,
    running: Arc<AtomicBool>,
}

impl LinkServer {
    pub fn new(link: Arc<UdpLink>, peer_device: DeviceId, heartbeat_interval: Option<Duration>) -> Self {
        let (messages, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self {
            link,
            peer_device,
            heartbeat_interval,
            messages,
            latest: Arc::new(LatestMessages::default()),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Decoded messages addressed to this device, in arrival order.
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.messages.subscribe()
    }

    pub fn latest(&self) -> Arc<LatestMessages> {
        Arc::clone(&self.latest)
    }

    /// Heartbeat this endpoint sends while it has nothing better to say.
    pub fn heartbeat_message(device: DeviceId) -> Message {
        let timestamp = util::timestamp_ms();
        match device {
            DeviceId::Gcs => Message::GcsHeartbeat(GcsHeartbeat {
                timestamp,
                status: 0,
            }),
            _ => Message::Heartbeat(Heartbeat {
                timestamp,
                armed: false,
                mode: FlightMode::Hold.to_u8(),
                system_status: SystemStatus::Standby.to_u8(),
                online: true,
            }),
        }
    }

    pub async fn start(&self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        info!(
            "Link server started as {} on {}",
            self.link.device(),
            self.link.local_addr()?
        );

        tokio::select! {
            result = self.receive_loop() => result,
            _ = self.heartbeat_loop() => Ok(()),
        }
    }

    async fn receive_loop(&self) -> Result<()> {
        while self.running.load(Ordering::SeqCst) {
            let received = self.link.recv().await?;
            let envelope = received.envelope;

            match envelope.message.message_type().direction() {
                Direction::ToVehicle => info!(
                    "[{} -> {}] {}",
                    envelope.source, envelope.target, envelope.message
                ),
                Direction::ToGcs => debug!(
                    "[{} -> {}] {}",
                    envelope.source, envelope.target, envelope.message
                ),
            }

            if let Err(e) = self.latest.record(&envelope) {
                warn!("Failed to record latest message: {:#}", e);
            }
            // No subscribers is fine
            let _ = self.messages.send(envelope);
        }
        Ok(())
    }

    async fn heartbeat_loop(&self) {
        let Some(period) = self.heartbeat_interval else {
            std::future::pending::<()>().await;
            return;
        };

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;
            let heartbeat = Self::heartbeat_message(self.link.device());
            if let Err(e) = self.link.send(self.peer_device, &heartbeat).await {
                warn!("Failed to send heartbeat: {:#}", e);
            }
        }
        info!("Heartbeat loop stopped");
    }

    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
