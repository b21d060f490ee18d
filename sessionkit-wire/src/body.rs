use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt as _, WriteBytesExt as _};

/// Every error body carries a fixed-size ASCII buffer rather than a
/// length-prefixed string, so the frame size for error messages is
/// constant regardless of payload. 499 bytes of text plus a NUL-ish
/// unused tail, matching the 500 byte buffer / 499 usable bytes split
/// called out in the spec's boundary tests.
pub const ERROR_MESSAGE_BUF_LEN: usize = 500;
pub const ERROR_MESSAGE_MAX_LEN: usize = ERROR_MESSAGE_BUF_LEN - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInitStart {
    pub client_session_id: u32,
}

impl SessionInitStart {
    pub const WIRE_LEN: usize = 4;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.client_session_id)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(SessionInitStart { client_session_id: r.read_u32::<LittleEndian>()? })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInitReply {
    pub client_session_id: u32,
    pub complete_session_id: u32,
}

impl SessionInitReply {
    pub const WIRE_LEN: usize = 8;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.client_session_id)?;
        w.write_u32::<LittleEndian>(self.complete_session_id)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(SessionInitReply {
            client_session_id: r.read_u32::<LittleEndian>()?,
            complete_session_id: r.read_u32::<LittleEndian>()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCloseStart {
    pub session_id: u32,
}

impl SessionCloseStart {
    pub const WIRE_LEN: usize = 4;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.session_id)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(SessionCloseStart { session_id: r.read_u32::<LittleEndian>()? })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCloseReply {
    pub session_id: u32,
}

impl SessionCloseReply {
    pub const WIRE_LEN: usize = 4;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.session_id)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(SessionCloseReply { session_id: r.read_u32::<LittleEndian>()? })
    }
}

/// A fixed-size error message body: 500 bytes of ASCII (truncated to 499
/// plus an implicit terminator on construction) plus the used length.
#[derive(Clone, Copy)]
pub struct ErrorBody {
    pub message: [u8; ERROR_MESSAGE_BUF_LEN],
    pub message_size: u64,
}

impl ErrorBody {
    pub const WIRE_LEN: usize = ERROR_MESSAGE_BUF_LEN + 8;

    pub fn new(text: &str) -> Self {
        let mut message = [0u8; ERROR_MESSAGE_BUF_LEN];
        let bytes = text.as_bytes();
        let n = bytes.len().min(ERROR_MESSAGE_MAX_LEN);
        message[..n].copy_from_slice(&bytes[..n]);
        ErrorBody { message, message_size: n as u64 }
    }

    pub fn text(&self) -> String {
        let n = (self.message_size as usize).min(ERROR_MESSAGE_BUF_LEN);
        String::from_utf8_lossy(&self.message[..n]).into_owned()
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.message)?;
        w.write_u64::<LittleEndian>(self.message_size)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut message = [0u8; ERROR_MESSAGE_BUF_LEN];
        r.read_exact(&mut message)?;
        let message_size = r.read_u64::<LittleEndian>()?;
        Ok(ErrorBody { message, message_size })
    }
}

impl std::fmt::Debug for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorBody")
            .field("message", &self.text())
            .field("message_size", &self.message_size)
            .finish()
    }
}

impl PartialEq for ErrorBody {
    fn eq(&self, other: &Self) -> bool {
        self.message_size == other.message_size && self.text() == other.text()
    }
}
impl Eq for ErrorBody {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_body_truncates() {
        let long = "x".repeat(600);
        let body = ErrorBody::new(&long);
        assert_eq!(body.message_size, ERROR_MESSAGE_MAX_LEN as u64);
        assert_eq!(body.text().len(), ERROR_MESSAGE_MAX_LEN);
    }

    #[test]
    fn error_body_round_trip() {
        let body = ErrorBody::new("unknown session 0xdeadbeef");
        let mut buf = Vec::new();
        body.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), ErrorBody::WIRE_LEN);
        let parsed = ErrorBody::read_from(&mut io::Cursor::new(buf)).unwrap();
        assert_eq!(parsed, body);
    }

    #[test]
    fn session_bodies_round_trip() {
        let a = SessionInitStart { client_session_id: 7 };
        let mut buf = Vec::new();
        a.write_to(&mut buf).unwrap();
        assert_eq!(SessionInitStart::read_from(&mut io::Cursor::new(buf)).unwrap(), a);

        let b = SessionInitReply { client_session_id: 7, complete_session_id: 0x0002_0007 };
        let mut buf = Vec::new();
        b.write_to(&mut buf).unwrap();
        assert_eq!(SessionInitReply::read_from(&mut io::Cursor::new(buf)).unwrap(), b);
    }
}
