//! Frame codec: the only place that knows the wire layout.
//!
//! ```text
//! +------+---------+--------+--------+---------+---------+--------+---------+-------+------+
//! | 0xFF | version | source | target | type lo | type hi | len LE | payload | crc LE| 0xFE |
//! |  1   |    1    |   1    |   1    |    1    |    1    |   2    |   len   |   2   |  1   |
//! +------+---------+--------+--------+---------+---------+--------+---------+-------+------+
//! ```
//!
//! The checksum covers `version..=payload`. Sentinels are not escaped, so a
//! frame can only be decoded from a buffer that holds exactly one frame.

use bytes::{BufMut, Bytes};

use super::crc::crc16;
use super::error::{EncodeError, FrameError, FramingFault};
use super::{DeviceId, MessageType};

pub const HEADER_BYTE: u8 = 0xFF;
pub const FOOTER_BYTE: u8 = 0xFE;
pub const VERSION: u8 = 0x01;

/// Sentinel + version + source + target + type (2) + length (2)
pub const HEADER_SIZE: usize = 8;
/// Checksum (2) + footer
pub const TRAILER_SIZE: usize = 3;
/// Frame with an empty payload
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + TRAILER_SIZE;
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// A validated frame with its payload still in wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub version: u8,
    pub source: DeviceId,
    pub target: DeviceId,
    pub message_type: MessageType,
    pub payload: Bytes,
    pub checksum: u16,
}

impl Packet {
    /// Total size of this packet on the wire.
    pub fn frame_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }
}

/// Build a frame around an already-serialized payload.
pub fn encode(
    source: DeviceId,
    target: DeviceId,
    message_type: MessageType,
    payload: &[u8],
) -> Result<Vec<u8>, EncodeError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(EncodeError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let code = message_type.to_u16();
    let mut frame = Vec::with_capacity(MIN_FRAME_SIZE + payload.len());
    frame.put_u8(HEADER_BYTE);
    frame.put_u8(VERSION);
    frame.put_u8(source.to_u8());
    frame.put_u8(target.to_u8());
    // Two separate bytes, low first. Peers parse them as independent fields.
    frame.put_u8((code & 0xFF) as u8);
    frame.put_u8((code >> 8) as u8);
    frame.put_u16_le(payload.len() as u16);
    frame.put_slice(payload);

    let checksum = crc16(&frame[1..]);
    frame.put_u16_le(checksum);
    frame.put_u8(FOOTER_BYTE);

    Ok(frame)
}

/// Validate one frame and split it into routing fields and payload.
///
/// Checks run in a fixed order and the first failure is returned: size,
/// sentinels, version, declared length, checksum, devices, message type.
pub fn decode(bytes: &[u8]) -> Result<Packet, FrameError> {
    if bytes.len() < MIN_FRAME_SIZE {
        return Err(FrameError::Truncated {
            expected: MIN_FRAME_SIZE,
            actual: bytes.len(),
        });
    }

    let last = bytes[bytes.len() - 1];
    if bytes[0] != HEADER_BYTE {
        return Err(FrameError::Framing(FramingFault::Header(bytes[0])));
    }
    if last != FOOTER_BYTE {
        return Err(FrameError::Framing(FramingFault::Footer(last)));
    }

    let version = bytes[1];
    if version != VERSION {
        return Err(FrameError::VersionMismatch(version));
    }

    let payload_len = u16::from_le_bytes([bytes[6], bytes[7]]) as usize;
    let frame_len = MIN_FRAME_SIZE + payload_len;
    if bytes.len() < frame_len {
        return Err(FrameError::Truncated {
            expected: frame_len,
            actual: bytes.len(),
        });
    }
    if bytes.len() > frame_len {
        return Err(FrameError::Framing(FramingFault::TrailingBytes(
            bytes.len() - frame_len,
        )));
    }

    let payload_end = HEADER_SIZE + payload_len;
    let received = u16::from_le_bytes([bytes[payload_end], bytes[payload_end + 1]]);
    let computed = crc16(&bytes[1..payload_end]);
    if received != computed {
        return Err(FrameError::Checksum { received, computed });
    }

    let source = DeviceId::from_u8(bytes[2]).ok_or(FrameError::UnknownDevice(bytes[2]))?;
    let target = DeviceId::from_u8(bytes[3]).ok_or(FrameError::UnknownDevice(bytes[3]))?;

    let code = u16::from(bytes[4]) | (u16::from(bytes[5]) << 8);
    let message_type = MessageType::from_u16(code).ok_or(FrameError::UnknownType(code))?;

    Ok(Packet {
        version,
        source,
        target,
        message_type,
        payload: Bytes::copy_from_slice(&bytes[HEADER_SIZE..payload_end]),
        checksum: received,
    })
}
