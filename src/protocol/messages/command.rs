//! GCS -> vehicle command payloads.

use bytes::{Buf, BufMut};
use serde::Serialize;
use std::fmt;

use super::names::{FlightMode, WaypointAction};
use super::{get_bool, put_bool, PayloadCodec};
use crate::protocol::MessageType;

pub const RC_CHANNELS: usize = 8;

/// GCS liveness, 8 bytes (3 trailing padding bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsHeartbeat {
    pub timestamp: u32,
    pub status: u8,
}

impl PayloadCodec for GcsHeartbeat {
    const MESSAGE_TYPE: MessageType = MessageType::GcsHeartbeat;
    const SIZE: usize = 8;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        buf.put_u8(self.status);
        buf.put_bytes(0, 3);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        let message = Self {
            timestamp: buf.get_u32_le(),
            status: buf.get_u8(),
        };
        buf.advance(3);
        message
    }
}

impl fmt::Display for GcsHeartbeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gcs heartbeat: status={:#04x}", self.status)
    }
}

/// Arm or disarm request, 8 bytes (2 trailing padding bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmCommand {
    pub timestamp: u32,
    pub arm: bool,
    /// Skip pre-arm checks on the vehicle
    pub force: bool,
}

impl PayloadCodec for ArmCommand {
    const MESSAGE_TYPE: MessageType = MessageType::ArmCommand;
    const SIZE: usize = 8;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        put_bool(buf, self.arm);
        put_bool(buf, self.force);
        buf.put_bytes(0, 2);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        let message = Self {
            timestamp: buf.get_u32_le(),
            arm: get_bool(buf),
            force: get_bool(buf),
        };
        buf.advance(2);
        message
    }
}

impl fmt::Display for ArmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.arm { "arm" } else { "disarm" };
        if self.force {
            write!(f, "command: {action} (forced)")
        } else {
            write!(f, "command: {action}")
        }
    }
}

/// Mode change request, 8 bytes (3 trailing padding bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMode {
    pub timestamp: u32,
    pub mode: u8,
}

impl PayloadCodec for SetMode {
    const MESSAGE_TYPE: MessageType = MessageType::SetMode;
    const SIZE: usize = 8;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        buf.put_u8(self.mode);
        buf.put_bytes(0, 3);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        let message = Self {
            timestamp: buf.get_u32_le(),
            mode: buf.get_u8(),
        };
        buf.advance(3);
        message
    }
}

impl fmt::Display for SetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command: set mode {}", FlightMode::describe(self.mode))
    }
}

/// Manual RC channel override, 20 bytes. A channel value of 0 releases that
/// channel back to the vehicle's own RC input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RcOverride {
    pub timestamp: u32,
    pub channels: [u16; RC_CHANNELS],
}

impl PayloadCodec for RcOverride {
    const MESSAGE_TYPE: MessageType = MessageType::RcOverride;
    const SIZE: usize = 4 + 2 * RC_CHANNELS;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        for channel in self.channels {
            buf.put_u16_le(channel);
        }
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        let timestamp = buf.get_u32_le();
        let mut channels = [0u16; RC_CHANNELS];
        for channel in channels.iter_mut() {
            *channel = buf.get_u16_le();
        }
        Self {
            timestamp,
            channels,
        }
    }
}

impl fmt::Display for RcOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command: rc override {:?}", self.channels)
    }
}

/// One mission waypoint, 40 bytes (3 trailing padding bytes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWaypoint {
    pub timestamp: u32,
    /// Zero-based index within the mission
    pub waypoint_id: u16,
    pub waypoint_count: u16,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f32,
    /// m/s
    pub speed: f32,
    /// Seconds
    pub hold_time: u32,
    pub action: u8,
}

impl PayloadCodec for SetWaypoint {
    const MESSAGE_TYPE: MessageType = MessageType::SetWaypoint;
    const SIZE: usize = 40;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        buf.put_u16_le(self.waypoint_id);
        buf.put_u16_le(self.waypoint_count);
        buf.put_f64_le(self.latitude);
        buf.put_f64_le(self.longitude);
        buf.put_f32_le(self.altitude);
        buf.put_f32_le(self.speed);
        buf.put_u32_le(self.hold_time);
        buf.put_u8(self.action);
        buf.put_bytes(0, 3);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        let message = Self {
            timestamp: buf.get_u32_le(),
            waypoint_id: buf.get_u16_le(),
            waypoint_count: buf.get_u16_le(),
            latitude: buf.get_f64_le(),
            longitude: buf.get_f64_le(),
            altitude: buf.get_f32_le(),
            speed: buf.get_f32_le(),
            hold_time: buf.get_u32_le(),
            action: buf.get_u8(),
        };
        buf.advance(3);
        message
    }
}

impl fmt::Display for SetWaypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "waypoint {}/{}: {:.6}, {:.6}, alt={} m, action={}",
            u32::from(self.waypoint_id) + 1,
            self.waypoint_count,
            self.latitude,
            self.longitude,
            self.altitude,
            WaypointAction::describe(self.action)
        )
    }
}
