use std::fmt;

/// The codec's error taxonomy. `ShortRead` is the "need more bytes, try
/// again later" signal a ring-buffer-driven dispatcher treats specially;
/// the rest indicate the stream itself is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Not enough bytes buffered yet to parse a full frame. Not a real
    /// error: the caller should wait for more bytes and retry.
    ShortRead,
    /// `header.version` did not match [`crate::header::VERSION`].
    BadVersion(u8),
    /// The 4 byte trailer did not match [`crate::header::TRAILER_SENTINEL`].
    BadTrailer(u32),
    /// `header.type` is not one of the known [`crate::header::MessageType`] values.
    UnknownType(u8),
    /// `header.type` is known but `header.subType` is not valid for it.
    UnknownSubType { msg_type: u8, sub_type: u8 },
    /// `header.size` is inconsistent with the body a known (type, subType)
    /// requires.
    InvalidMessageSize { want_at_least: usize, got: u32 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::ShortRead => write!(f, "short read: not enough bytes for a full frame"),
            CodecError::BadVersion(v) => write!(f, "bad version: got {v}, want {}", crate::header::VERSION),
            CodecError::BadTrailer(v) => {
                write!(f, "bad trailer: got {v:#010x}, want {:#010x}", crate::header::TRAILER_SENTINEL)
            }
            CodecError::UnknownType(t) => write!(f, "unknown message type {t}"),
            CodecError::UnknownSubType { msg_type, sub_type } => {
                write!(f, "unknown sub-type {sub_type} for message type {msg_type}")
            }
            CodecError::InvalidMessageSize { want_at_least, got } => {
                write!(f, "invalid message size: got {got}, want at least {want_at_least}")
            }
        }
    }
}

impl std::error::Error for CodecError {}
