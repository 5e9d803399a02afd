//! Error types for the link protocol.
//!
//! Every failure a frame or payload can produce is one of these values. None
//! of them is fatal: the caller drops the offending frame and carries on.

use thiserror::Error;

use super::MessageType;

/// Why a received buffer was not accepted as a frame.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer is shorter than the minimum frame, or than the frame its
    /// length field declares
    #[error("frame truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Header/footer sentinel missing, or bytes beyond the declared frame
    #[error("framing error: {0}")]
    Framing(FramingFault),

    #[error("unsupported protocol version: {0:#04x}")]
    VersionMismatch(u8),

    #[error("checksum mismatch: frame carries {received:#06x}, computed {computed:#06x}")]
    Checksum { received: u16, computed: u16 },

    #[error("unknown device id: {0:#04x}")]
    UnknownDevice(u8),

    #[error("unknown message type: {0:#06x}")]
    UnknownType(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingFault {
    Header(u8),
    Footer(u8),
    TrailingBytes(usize),
}

impl std::fmt::Display for FramingFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramingFault::Header(byte) => write!(f, "expected header 0xff, found {byte:#04x}"),
            FramingFault::Footer(byte) => write!(f, "expected footer 0xfe, found {byte:#04x}"),
            FramingFault::TrailingBytes(count) => {
                write!(f, "{count} bytes past the declared end of frame")
            }
        }
    }
}

impl FrameError {
    /// Link corruption or lost byte alignment.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            FrameError::Truncated { .. } | FrameError::Framing(_) | FrameError::Checksum { .. }
        )
    }

    /// A well-formed frame the peer understands differently: version or
    /// registry skew between the two ends.
    pub fn is_protocol_skew(&self) -> bool {
        matches!(
            self,
            FrameError::VersionMismatch(_) | FrameError::UnknownDevice(_) | FrameError::UnknownType(_)
        )
    }

    /// Short stable name, used for logging and counters.
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::Truncated { .. } => "truncated",
            FrameError::Framing(_) => "framing",
            FrameError::VersionMismatch(_) => "version_mismatch",
            FrameError::Checksum { .. } => "checksum",
            FrameError::UnknownDevice(_) => "unknown_device",
            FrameError::UnknownType(_) => "unknown_type",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge { size: usize, max: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    #[error("{message_type} payload size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        message_type: MessageType,
        expected: usize,
        actual: usize,
    },
}

/// Any failure from turning bytes into a typed message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;
