//! Vehicle -> GCS telemetry payloads.

use bytes::{Buf, BufMut};
use serde::Serialize;
use std::fmt;

use super::names::{FlightMode, GpsFixType, SystemStatus};
use super::{get_bool, put_bool, PayloadCodec};
use crate::protocol::MessageType;

/// Vehicle liveness and top-level state, 8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    pub timestamp: u32,
    pub armed: bool,
    pub mode: u8,
    pub system_status: u8,
    pub online: bool,
}

impl PayloadCodec for Heartbeat {
    const MESSAGE_TYPE: MessageType = MessageType::Heartbeat;
    const SIZE: usize = 8;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        put_bool(buf, self.armed);
        buf.put_u8(self.mode);
        buf.put_u8(self.system_status);
        put_bool(buf, self.online);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        Self {
            timestamp: buf.get_u32_le(),
            armed: get_bool(buf),
            mode: buf.get_u8(),
            system_status: buf.get_u8(),
            online: get_bool(buf),
        }
    }
}

impl fmt::Display for Heartbeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "heartbeat: armed={}, mode={}, status={}, online={}",
            self.armed,
            FlightMode::describe(self.mode),
            SystemStatus::describe(self.system_status),
            self.online
        )
    }
}

/// Body attitude in radians and angular rates in rad/s, 28 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attitude {
    pub timestamp: u32,
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll_speed: f32,
    pub pitch_speed: f32,
    pub yaw_speed: f32,
}

impl PayloadCodec for Attitude {
    const MESSAGE_TYPE: MessageType = MessageType::Attitude;
    const SIZE: usize = 28;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        buf.put_f32_le(self.roll);
        buf.put_f32_le(self.pitch);
        buf.put_f32_le(self.yaw);
        buf.put_f32_le(self.roll_speed);
        buf.put_f32_le(self.pitch_speed);
        buf.put_f32_le(self.yaw_speed);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        Self {
            timestamp: buf.get_u32_le(),
            roll: buf.get_f32_le(),
            pitch: buf.get_f32_le(),
            yaw: buf.get_f32_le(),
            roll_speed: buf.get_f32_le(),
            pitch_speed: buf.get_f32_le(),
            yaw_speed: buf.get_f32_le(),
        }
    }
}

impl fmt::Display for Attitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attitude: roll={:.1}°, pitch={:.1}°, yaw={:.1}°",
            self.roll.to_degrees(),
            self.pitch.to_degrees(),
            self.yaw.to_degrees()
        )
    }
}

/// Ground/vertical speed in m/s and heading in radians, 16 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    pub timestamp: u32,
    pub ground_speed: f32,
    pub vertical_speed: f32,
    pub heading: f32,
}

impl PayloadCodec for Motion {
    const MESSAGE_TYPE: MessageType = MessageType::Motion;
    const SIZE: usize = 16;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        buf.put_f32_le(self.ground_speed);
        buf.put_f32_le(self.vertical_speed);
        buf.put_f32_le(self.heading);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        Self {
            timestamp: buf.get_u32_le(),
            ground_speed: buf.get_f32_le(),
            vertical_speed: buf.get_f32_le(),
            heading: buf.get_f32_le(),
        }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "motion: ground={:.2} m/s, vertical={:.2} m/s, heading={:.1}°",
            self.ground_speed,
            self.vertical_speed,
            self.heading.to_degrees()
        )
    }
}

/// GNSS position fix, 28 bytes. `hdop` is scaled by 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsFix {
    pub timestamp: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f32,
    pub fix_type: u8,
    pub satellites: u8,
    pub hdop: u16,
}

impl PayloadCodec for GpsFix {
    const MESSAGE_TYPE: MessageType = MessageType::Gps;
    const SIZE: usize = 28;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        buf.put_f64_le(self.latitude);
        buf.put_f64_le(self.longitude);
        buf.put_f32_le(self.altitude);
        buf.put_u8(self.fix_type);
        buf.put_u8(self.satellites);
        buf.put_u16_le(self.hdop);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        Self {
            timestamp: buf.get_u32_le(),
            latitude: buf.get_f64_le(),
            longitude: buf.get_f64_le(),
            altitude: buf.get_f32_le(),
            fix_type: buf.get_u8(),
            satellites: buf.get_u8(),
            hdop: buf.get_u16_le(),
        }
    }
}

impl fmt::Display for GpsFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gps: {:.6}, {:.6}, alt={:.1} m, fix={}, satellites={}",
            self.latitude,
            self.longitude,
            self.altitude,
            GpsFixType::describe(self.fix_type),
            self.satellites
        )
    }
}

/// Battery pack state, 16 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Battery {
    pub timestamp: u32,
    /// Volts
    pub voltage: f32,
    /// Amps, positive when discharging
    pub current: f32,
    pub percent: u8,
    pub charging: bool,
    pub remaining_min: u16,
}

impl PayloadCodec for Battery {
    const MESSAGE_TYPE: MessageType = MessageType::Battery;
    const SIZE: usize = 16;

    fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_u32_le(self.timestamp);
        buf.put_f32_le(self.voltage);
        buf.put_f32_le(self.current);
        buf.put_u8(self.percent);
        put_bool(buf, self.charging);
        buf.put_u16_le(self.remaining_min);
    }

    fn read_from(buf: &mut impl Buf) -> Self {
        Self {
            timestamp: buf.get_u32_le(),
            voltage: buf.get_f32_le(),
            current: buf.get_f32_le(),
            percent: buf.get_u8(),
            charging: get_bool(buf),
            remaining_min: buf.get_u16_le(),
        }
    }
}

impl fmt::Display for Battery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "battery: {:.2} V, {:.2} A, {}%, {} min left{}",
            self.voltage,
            self.current,
            self.percent,
            self.remaining_min,
            if self.charging { ", charging" } else { "" }
        )
    }
}
