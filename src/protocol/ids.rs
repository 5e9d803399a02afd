//! Device and message-type registries.
//!
//! Both registries are closed: a wire value that is not listed here cannot be
//! represented, and the frame decoder rejects it with
//! [`FrameError::UnknownDevice`](super::FrameError::UnknownDevice) or
//! [`FrameError::UnknownType`](super::FrameError::UnknownType). Extending the
//! protocol means extending these enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing identity of a link endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum DeviceId {
    Gcs = 0x01,
    Uav = 0x02,
    Ugv = 0x03,
    Broadcast = 0xFF,
}

impl DeviceId {
    pub const ALL: [DeviceId; 4] = [Self::Gcs, Self::Uav, Self::Ugv, Self::Broadcast];

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Gcs),
            0x02 => Some(Self::Uav),
            0x03 => Some(Self::Ugv),
            0xFF => Some(Self::Broadcast),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// True when a frame addressed to `target` should be accepted by `self`.
    pub fn accepts(self, target: DeviceId) -> bool {
        target == self || target == Self::Broadcast
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gcs => "GCS",
            Self::Uav => "UAV",
            Self::Ugv => "UGV",
            Self::Broadcast => "BROADCAST",
        };
        f.write_str(name)
    }
}

/// Which way a message type normally flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Vehicle telemetry, codes 0x0100-0x02FF
    ToGcs,
    /// GCS commands, codes 0x1000-0x11FF
    ToVehicle,
}

/// Payload kind carried by a frame.
///
/// Vehicle -> GCS codes live in `0x0100-0x02FF` and GCS -> vehicle codes in
/// `0x1000-0x11FF`. The ranges are a naming convention; the codec accepts any
/// registered type in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    // Vehicle -> GCS
    Heartbeat = 0x0101,
    Attitude = 0x0102,
    Motion = 0x0103,
    Gps = 0x0104,
    Battery = 0x0201,

    // GCS -> vehicle
    GcsHeartbeat = 0x1001,
    ArmCommand = 0x1002,
    SetMode = 0x1003,
    RcOverride = 0x1005,
    SetWaypoint = 0x1101,
}

impl MessageType {
    pub const ALL: [MessageType; 10] = [
        Self::Heartbeat,
        Self::Attitude,
        Self::Motion,
        Self::Gps,
        Self::Battery,
        Self::GcsHeartbeat,
        Self::ArmCommand,
        Self::SetMode,
        Self::RcOverride,
        Self::SetWaypoint,
    ];

    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0101 => Some(Self::Heartbeat),
            0x0102 => Some(Self::Attitude),
            0x0103 => Some(Self::Motion),
            0x0104 => Some(Self::Gps),
            0x0201 => Some(Self::Battery),
            0x1001 => Some(Self::GcsHeartbeat),
            0x1002 => Some(Self::ArmCommand),
            0x1003 => Some(Self::SetMode),
            0x1005 => Some(Self::RcOverride),
            0x1101 => Some(Self::SetWaypoint),
            _ => None,
        }
    }

    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    pub const fn direction(self) -> Direction {
        if (self as u16) < 0x1000 {
            Direction::ToGcs
        } else {
            Direction::ToVehicle
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Heartbeat => "HEARTBEAT",
            Self::Attitude => "ATTITUDE",
            Self::Motion => "MOTION",
            Self::Gps => "GPS",
            Self::Battery => "BATTERY",
            Self::GcsHeartbeat => "GCS_HEARTBEAT",
            Self::ArmCommand => "ARM_COMMAND",
            Self::SetMode => "SET_MODE",
            Self::RcOverride => "RC_OVERRIDE",
            Self::SetWaypoint => "SET_WAYPOINT",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name(), self.to_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_registry_is_closed() {
        for device in DeviceId::ALL {
            assert_eq!(DeviceId::from_u8(device.to_u8()), Some(device));
        }
        let known = DeviceId::ALL.map(DeviceId::to_u8);
        for value in 0..=u8::MAX {
            if !known.contains(&value) {
                assert_eq!(DeviceId::from_u8(value), None, "value {value:#04x}");
            }
        }
    }

    #[test]
    fn test_message_type_registry() {
        for ty in MessageType::ALL {
            assert_eq!(MessageType::from_u16(ty.to_u16()), Some(ty));
        }
        assert_eq!(MessageType::from_u16(0x0000), None);
        assert_eq!(MessageType::from_u16(0x1004), None);
        assert_eq!(MessageType::from_u16(0xFFFF), None);
    }

    #[test]
    fn test_direction_follows_code_range() {
        assert_eq!(MessageType::Battery.direction(), Direction::ToGcs);
        assert_eq!(MessageType::Heartbeat.direction(), Direction::ToGcs);
        assert_eq!(MessageType::GcsHeartbeat.direction(), Direction::ToVehicle);
        assert_eq!(MessageType::SetWaypoint.direction(), Direction::ToVehicle);
    }

    #[test]
    fn test_broadcast_is_accepted_everywhere() {
        assert!(DeviceId::Uav.accepts(DeviceId::Broadcast));
        assert!(DeviceId::Uav.accepts(DeviceId::Uav));
        assert!(!DeviceId::Uav.accepts(DeviceId::Ugv));
    }

    #[test]
    fn test_device_id_from_config_name() {
        let device: DeviceId = serde_json::from_str("\"ugv\"").unwrap();
        assert_eq!(device, DeviceId::Ugv);
    }
}
