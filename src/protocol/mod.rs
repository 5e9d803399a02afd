//! GCS <-> vehicle link protocol.
//!
//! A message is serialized by its payload codec ([`messages`]), then wrapped by
//! the frame codec ([`frame`]) with routing fields, length and a CRC-16. The
//! receiving side validates the frame, and the frame's message type selects the
//! payload codec that rebuilds the typed [`Message`].
//!
//! Everything in here is synchronous and stateless, so it can be called from
//! any number of tasks or threads at once.

pub mod crc;
pub mod error;
pub mod frame;
pub mod ids;
pub mod message;
pub mod messages;

pub use crc::crc16;
pub use error::{EncodeError, FrameError, FramingFault, PayloadError, ProtocolError};
pub use frame::{Packet, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, VERSION};
pub use ids::{DeviceId, Direction, MessageType};
pub use message::{decode_frame, encode_frame, Envelope, Message};
pub use messages::PayloadCodec;
