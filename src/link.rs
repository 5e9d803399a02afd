//! UDP transport for link frames.
//!
//! Frames carry no byte stuffing, so the sentinel values 0xFF/0xFE can appear
//! inside payloads and a receiver cannot find frame boundaries by scanning a
//! raw byte stream. The link therefore requires a length-delimited transport:
//! one UDP datagram carries exactly one frame, and the datagram boundary is
//! the frame boundary handed to the decoder.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::protocol::{
    decode_frame, encode_frame, DeviceId, Envelope, FrameError, Message, ProtocolError,
    MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE,
};

const RECV_BUFFER_SIZE: usize = MIN_FRAME_SIZE + MAX_PAYLOAD_SIZE;

/// Per-link frame counters. Shared between the link and whoever reports them.
#[derive(Debug, Default)]
pub struct LinkStats {
    sent: AtomicU64,
    received: AtomicU64,
    truncated: AtomicU64,
    framing: AtomicU64,
    version_mismatch: AtomicU64,
    checksum: AtomicU64,
    unknown_device: AtomicU64,
    unknown_type: AtomicU64,
    payload_size: AtomicU64,
    not_for_us: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStatsSnapshot {
    pub sent: u64,
    pub received: u64,
    pub truncated: u64,
    pub framing: u64,
    pub version_mismatch: u64,
    pub checksum: u64,
    pub unknown_device: u64,
    pub unknown_type: u64,
    pub payload_size: u64,
    pub not_for_us: u64,
}

impl LinkStatsSnapshot {
    /// Frames dropped because of link corruption or lost alignment.
    pub fn corrupted(&self) -> u64 {
        self.truncated + self.framing + self.checksum
    }

    /// Well-formed frames this build does not understand.
    pub fn skewed(&self) -> u64 {
        self.version_mismatch + self.unknown_device + self.unknown_type + self.payload_size
    }
}

impl LinkStats {
    fn counter_for(&self, error: &ProtocolError) -> &AtomicU64 {
        match error {
            ProtocolError::Frame(frame) => match frame {
                FrameError::Truncated { .. } => &self.truncated,
                FrameError::Framing(_) => &self.framing,
                FrameError::VersionMismatch(_) => &self.version_mismatch,
                FrameError::Checksum { .. } => &self.checksum,
                FrameError::UnknownDevice(_) => &self.unknown_device,
                FrameError::UnknownType(_) => &self.unknown_type,
            },
            ProtocolError::Payload(_) | ProtocolError::Encode(_) => &self.payload_size,
        }
    }

    pub fn record_sent(&self) {
        self.sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, error: &ProtocolError) {
        self.counter_for(error).fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_not_for_us(&self) {
        self.not_for_us.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LinkStatsSnapshot {
        LinkStatsSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            framing: self.framing.load(Ordering::Relaxed),
            version_mismatch: self.version_mismatch.load(Ordering::Relaxed),
            checksum: self.checksum.load(Ordering::Relaxed),
            unknown_device: self.unknown_device.load(Ordering::Relaxed),
            unknown_type: self.unknown_type.load(Ordering::Relaxed),
            payload_size: self.payload_size.load(Ordering::Relaxed),
            not_for_us: self.not_for_us.load(Ordering::Relaxed),
        }
    }
}

/// A frame accepted by [`UdpLink::recv`].
#[derive(Debug, Clone)]
pub struct Received {
    pub envelope: Envelope,
    pub from: SocketAddr,
}

pub struct UdpLink {
    socket: UdpSocket,
    device: DeviceId,
    peer: Option<SocketAddr>,
    recv_buf: Mutex<Vec<u8>>,
    stats: Arc<LinkStats>,
}

impl UdpLink {
    pub async fn bind(device: DeviceId, addr: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .with_context(|| format!("Failed to bind link socket to {}", addr))?;
        Ok(Self {
            socket,
            device,
            peer: None,
            recv_buf: Mutex::new(vec![0u8; RECV_BUFFER_SIZE]),
            stats: Arc::new(LinkStats::default()),
        })
    }

    /// Default destination for [`UdpLink::send`].
    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .context("Failed to read link socket address")
    }

    pub fn stats(&self) -> Arc<LinkStats> {
        Arc::clone(&self.stats)
    }

    pub async fn send_to(&self, target: DeviceId, message: &Message, addr: SocketAddr) -> Result<()> {
        let frame = encode_frame(self.device, target, message)?;
        self.socket
            .send_to(&frame, addr)
            .await
            .with_context(|| format!("Failed to send {} to {}", message.message_type(), addr))?;
        self.stats.record_sent();
        debug!("Sent {} to {} ({}, {} bytes)", message, target, addr, frame.len());
        Ok(())
    }

    pub async fn send(&self, target: DeviceId, message: &Message) -> Result<()> {
        let peer = self
            .peer
            .ok_or_else(|| anyhow!("No peer configured for link"))?;
        self.send_to(target, message, peer).await
    }

    /// Wait for the next valid frame addressed to this device.
    ///
    /// Frames that fail to decode, or that are addressed elsewhere, are
    /// counted and dropped; only socket errors end the call early.
    pub async fn recv(&self) -> Result<Received> {
        let mut buf = self.recv_buf.lock().await;
        loop {
            let (len, from) = self
                .socket
                .recv_from(&mut buf[..])
                .await
                .context("Failed to receive on link socket")?;

            let envelope = match decode_frame(&buf[..len]) {
                Ok(envelope) => envelope,
                Err(e) => {
                    self.stats.record_dropped(&e);
                    warn!("Dropping {} byte frame from {}: {}", len, from, e);
                    continue;
                }
            };

            if !self.device.accepts(envelope.target) {
                self.stats.record_not_for_us();
                debug!(
                    "Ignoring {} from {} addressed to {}",
                    envelope.message.message_type(),
                    envelope.source,
                    envelope.target
                );
                continue;
            }

            self.stats.record_received();
            return Ok(Received { envelope, from });
        }
    }
}

#[cfg(test)]
mod tests;
