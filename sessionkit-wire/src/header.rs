use std::{
    fmt,
    io::{self, Read, Write},
};

use byteorder::{LittleEndian, ReadBytesExt as _, WriteBytesExt as _};

/// The only wire version this crate speaks. Bumped only on a breaking
/// change to the framing format itself (not per-type bodies).
pub const VERSION: u8 = 1;

/// Size in bytes of [`CommonMessageHeader`] on the wire.
pub const HEADER_LEN: usize = 16;

/// Size in bytes of the trailer that terminates every frame.
pub const TRAILER_LEN: usize = 4;

/// Fixed sentinel that closes every frame. A mismatch here means the
/// stream has desynchronized (or corrupted) and the session must be torn
/// down rather than resynchronized.
pub const TRAILER_SENTINEL: u32 = 0x4E5A_4E41;

/// Bit 0 of `flags`: the sender expects a reply and has registered a
/// reply-tracker expectation before handing the frame to the transport.
pub const FLAG_REPLY_REQUIRED: u8 = 0x1;

/// Top-level message type, occupying the `type` byte of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Session = 1,
    Heartbeat = 2,
    Error = 3,
    Data = 4,
    SubProtocol = 5,
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, u8> {
        match v {
            1 => Ok(MessageType::Session),
            2 => Ok(MessageType::Heartbeat),
            3 => Ok(MessageType::Error),
            4 => Ok(MessageType::Data),
            5 => Ok(MessageType::SubProtocol),
            other => Err(other),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageType::Session => "SESSION",
            MessageType::Heartbeat => "HEARTBEAT",
            MessageType::Error => "ERROR",
            MessageType::Data => "DATA",
            MessageType::SubProtocol => "SUB_PROTOCOL",
        };
        write!(f, "{s}")
    }
}

/// The 16 byte header that prefixes every frame. Packed, little-endian
/// on the wire; this struct itself has normal Rust layout and is only
/// ever (de)serialized field-by-field through [`CommonMessageHeader::write_to`]
/// and [`CommonMessageHeader::read_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonMessageHeader {
    pub version: u8,
    pub msg_type: u8,
    pub sub_type: u8,
    pub flags: u8,
    pub message_id: u32,
    pub session_id: u32,
    /// Total frame size in bytes, including this header and the trailer.
    pub size: u32,
}

impl CommonMessageHeader {
    pub fn new(
        msg_type: MessageType,
        sub_type: u8,
        reply_required: bool,
        message_id: u32,
        session_id: u32,
        size: u32,
    ) -> Self {
        CommonMessageHeader {
            version: VERSION,
            msg_type: msg_type as u8,
            sub_type,
            flags: if reply_required { FLAG_REPLY_REQUIRED } else { 0 },
            message_id,
            session_id,
            size,
        }
    }

    pub fn reply_required(&self) -> bool {
        self.flags & FLAG_REPLY_REQUIRED != 0
    }

    /// Peek a header out of a byte slice without consuming it. Returns
    /// `None` if fewer than [`HEADER_LEN`] bytes are available, mirroring
    /// the `ShortRead` behavior callers must handle by waiting for more
    /// bytes to arrive on the ring buffer.
    pub fn read_from(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN {
            return None;
        }
        let mut r = io::Cursor::new(buf);
        Some(CommonMessageHeader {
            version: r.read_u8().ok()?,
            msg_type: r.read_u8().ok()?,
            sub_type: r.read_u8().ok()?,
            flags: r.read_u8().ok()?,
            message_id: r.read_u32::<LittleEndian>().ok()?,
            session_id: r.read_u32::<LittleEndian>().ok()?,
            size: r.read_u32::<LittleEndian>().ok()?,
        })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u8(self.version)?;
        w.write_u8(self.msg_type)?;
        w.write_u8(self.sub_type)?;
        w.write_u8(self.flags)?;
        w.write_u32::<LittleEndian>(self.message_id)?;
        w.write_u32::<LittleEndian>(self.session_id)?;
        w.write_u32::<LittleEndian>(self.size)?;
        Ok(())
    }
}

/// The 4 byte trailer that closes every frame.
pub fn write_trailer<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_u32::<LittleEndian>(TRAILER_SENTINEL)
}

pub fn read_trailer<R: Read>(r: &mut R) -> io::Result<u32> {
    r.read_u32::<LittleEndian>()
}

/// Composes a fully-established session-id from its two 16-bit halves:
/// the client picks the low 16 bits, the server picks the high 16 bits.
pub fn compose_session_id(server_half: u16, client_half: u16) -> u32 {
    ((server_half as u32) << 16) | (client_half as u32)
}

/// Splits a fully-established session-id back into (server_half, client_half).
pub fn split_session_id(session_id: u32) -> (u16, u16) {
    ((session_id >> 16) as u16, (session_id & 0xFFFF) as u16)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn header_round_trip() {
        let h = CommonMessageHeader::new(MessageType::Data, 1, true, 42, 0xAABB_CCDD, 123);
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_LEN);
        let parsed = CommonMessageHeader::read_from(&buf).expect("enough bytes");
        assert_eq!(parsed, h);
        assert!(parsed.reply_required());
    }

    #[test]
    fn header_short_read() {
        let buf = [0u8; HEADER_LEN - 1];
        assert!(CommonMessageHeader::read_from(&buf).is_none());
    }

    #[test]
    fn session_id_composition() {
        let id = compose_session_id(0x0002, 0x0001);
        assert_eq!(id, 0x0002_0001);
        assert_eq!(split_session_id(id), (0x0002, 0x0001));
    }
}
