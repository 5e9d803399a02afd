//! Fixed-layout payload codecs, one per message type.
//!
//! Payloads carry no length prefix; the frame supplies it. All multi-byte
//! fields are little-endian and written field by field, so struct layout and
//! alignment never leak onto the wire.

pub mod command;
pub mod names;
pub mod telemetry;

use bytes::{Buf, BufMut};

use super::error::PayloadError;
use super::MessageType;

pub use command::{ArmCommand, GcsHeartbeat, RcOverride, SetMode, SetWaypoint};
pub use names::{FlightMode, GpsFixType, SystemStatus, WaypointAction};
pub use telemetry::{Attitude, Battery, GpsFix, Heartbeat, Motion};

pub trait PayloadCodec: Sized {
    const MESSAGE_TYPE: MessageType;
    /// Exact payload size in bytes
    const SIZE: usize;

    fn write_to(&self, buf: &mut impl BufMut);

    /// Read the layout from a buffer holding exactly [`Self::SIZE`] bytes.
    fn read_from(buf: &mut impl Buf) -> Self;

    fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        self.write_to(&mut buf);
        debug_assert_eq!(buf.len(), Self::SIZE);
        buf
    }

    fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.len() != Self::SIZE {
            return Err(PayloadError::SizeMismatch {
                message_type: Self::MESSAGE_TYPE,
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        let mut buf = bytes;
        Ok(Self::read_from(&mut buf))
    }
}

fn put_bool(buf: &mut impl BufMut, value: bool) {
    buf.put_u8(u8::from(value));
}

fn get_bool(buf: &mut impl Buf) -> bool {
    buf.get_u8() != 0
}

#[cfg(test)]
mod tests;
