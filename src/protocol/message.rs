//! Typed messages and the single point where a message type selects its
//! payload codec.

use serde::Serialize;
use std::fmt;

use super::error::{EncodeError, PayloadError, ProtocolError};
use super::frame::{self, Packet};
use super::messages::*;
use super::{DeviceId, MessageType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Message {
    Heartbeat(Heartbeat),
    Attitude(Attitude),
    Motion(Motion),
    Gps(GpsFix),
    Battery(Battery),
    GcsHeartbeat(GcsHeartbeat),
    ArmCommand(ArmCommand),
    SetMode(SetMode),
    RcOverride(RcOverride),
    SetWaypoint(SetWaypoint),
}

impl Message {
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::Heartbeat(_) => MessageType::Heartbeat,
            Self::Attitude(_) => MessageType::Attitude,
            Self::Motion(_) => MessageType::Motion,
            Self::Gps(_) => MessageType::Gps,
            Self::Battery(_) => MessageType::Battery,
            Self::GcsHeartbeat(_) => MessageType::GcsHeartbeat,
            Self::ArmCommand(_) => MessageType::ArmCommand,
            Self::SetMode(_) => MessageType::SetMode,
            Self::RcOverride(_) => MessageType::RcOverride,
            Self::SetWaypoint(_) => MessageType::SetWaypoint,
        }
    }

    pub const fn timestamp(&self) -> u32 {
        match self {
            Self::Heartbeat(m) => m.timestamp,
            Self::Attitude(m) => m.timestamp,
            Self::Motion(m) => m.timestamp,
            Self::Gps(m) => m.timestamp,
            Self::Battery(m) => m.timestamp,
            Self::GcsHeartbeat(m) => m.timestamp,
            Self::ArmCommand(m) => m.timestamp,
            Self::SetMode(m) => m.timestamp,
            Self::RcOverride(m) => m.timestamp,
            Self::SetWaypoint(m) => m.timestamp,
        }
    }

    pub fn encode_payload(&self) -> Vec<u8> {
        match self {
            Self::Heartbeat(m) => m.encode(),
            Self::Attitude(m) => m.encode(),
            Self::Motion(m) => m.encode(),
            Self::Gps(m) => m.encode(),
            Self::Battery(m) => m.encode(),
            Self::GcsHeartbeat(m) => m.encode(),
            Self::ArmCommand(m) => m.encode(),
            Self::SetMode(m) => m.encode(),
            Self::RcOverride(m) => m.encode(),
            Self::SetWaypoint(m) => m.encode(),
        }
    }

    pub fn decode(message_type: MessageType, payload: &[u8]) -> Result<Self, PayloadError> {
        let message = match message_type {
            MessageType::Heartbeat => Self::Heartbeat(Heartbeat::decode(payload)?),
            MessageType::Attitude => Self::Attitude(Attitude::decode(payload)?),
            MessageType::Motion => Self::Motion(Motion::decode(payload)?),
            MessageType::Gps => Self::Gps(GpsFix::decode(payload)?),
            MessageType::Battery => Self::Battery(Battery::decode(payload)?),
            MessageType::GcsHeartbeat => Self::GcsHeartbeat(GcsHeartbeat::decode(payload)?),
            MessageType::ArmCommand => Self::ArmCommand(ArmCommand::decode(payload)?),
            MessageType::SetMode => Self::SetMode(SetMode::decode(payload)?),
            MessageType::RcOverride => Self::RcOverride(RcOverride::decode(payload)?),
            MessageType::SetWaypoint => Self::SetWaypoint(SetWaypoint::decode(payload)?),
        };
        Ok(message)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heartbeat(m) => fmt::Display::fmt(m, f),
            Self::Attitude(m) => fmt::Display::fmt(m, f),
            Self::Motion(m) => fmt::Display::fmt(m, f),
            Self::Gps(m) => fmt::Display::fmt(m, f),
            Self::Battery(m) => fmt::Display::fmt(m, f),
            Self::GcsHeartbeat(m) => fmt::Display::fmt(m, f),
            Self::ArmCommand(m) => fmt::Display::fmt(m, f),
            Self::SetMode(m) => fmt::Display::fmt(m, f),
            Self::RcOverride(m) => fmt::Display::fmt(m, f),
            Self::SetWaypoint(m) => fmt::Display::fmt(m, f),
        }
    }
}

macro_rules! impl_from_payload {
    ($($variant:ident($payload:ty)),+ $(,)?) => {
        $(impl From<$payload> for Message {
            fn from(payload: $payload) -> Self {
                Self::$variant(payload)
            }
        })+
    };
}

impl_from_payload!(
    Heartbeat(Heartbeat),
    Attitude(Attitude),
    Motion(Motion),
    Gps(GpsFix),
    Battery(Battery),
    GcsHeartbeat(GcsHeartbeat),
    ArmCommand(ArmCommand),
    SetMode(SetMode),
    RcOverride(RcOverride),
    SetWaypoint(SetWaypoint),
);

/// A decoded frame: routing plus typed message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub source: DeviceId,
    pub target: DeviceId,
    pub message: Message,
}

impl TryFrom<Packet> for Envelope {
    type Error = PayloadError;

    fn try_from(packet: Packet) -> Result<Self, Self::Error> {
        Ok(Self {
            source: packet.source,
            target: packet.target,
            message: Message::decode(packet.message_type, &packet.payload)?,
        })
    }
}

/// Serialize `message` and wrap it in a frame.
pub fn encode_frame(
    source: DeviceId,
    target: DeviceId,
    message: &Message,
) -> Result<Vec<u8>, EncodeError> {
    frame::encode(source, target, message.message_type(), &message.encode_payload())
}

/// Validate a frame and decode its payload into a typed message.
pub fn decode_frame(bytes: &[u8]) -> Result<Envelope, ProtocolError> {
    let packet = frame::decode(bytes)?;
    Ok(Envelope::try_from(packet)?)
}
