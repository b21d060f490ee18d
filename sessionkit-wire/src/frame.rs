//! Ties [`crate::header`] and [`crate::body`] together into whole frames
//! that can be decoded off a ring buffer one message at a time.

use std::io::{self, Write};

use crate::body::{ErrorBody, SessionCloseReply, SessionCloseStart, SessionInitReply, SessionInitStart};
use crate::error::CodecError;
use crate::header::{self, CommonMessageHeader, MessageType};
use crate::subtype::{DataSubType, ErrorSubType, HeartbeatSubType, SessionSubType};

/// A fully decoded frame: header plus its typed body. `Data` and
/// `SubProtocol` bodies are carried as owned byte vectors rather than a
/// fixed struct since their payload is opaque to this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    SessionInitStart(CommonMessageHeader, SessionInitStart),
    SessionInitReply(CommonMessageHeader, SessionInitReply),
    SessionCloseStart(CommonMessageHeader, SessionCloseStart),
    SessionCloseReply(CommonMessageHeader, SessionCloseReply),
    HeartbeatStart(CommonMessageHeader),
    HeartbeatReply(CommonMessageHeader),
    Error(CommonMessageHeader, ErrorBody),
    Data(CommonMessageHeader, DataSubType, Vec<u8>),
    SubProtocol(CommonMessageHeader, Vec<u8>),
}

impl Frame {
    pub fn header(&self) -> &CommonMessageHeader {
        match self {
            Frame::SessionInitStart(h, _)
            | Frame::SessionInitReply(h, _)
            | Frame::SessionCloseStart(h, _)
            | Frame::SessionCloseReply(h, _)
            | Frame::HeartbeatStart(h)
            | Frame::HeartbeatReply(h)
            | Frame::Error(h, _)
            | Frame::Data(h, _, _)
            | Frame::SubProtocol(h, _) => h,
        }
    }

    /// Encodes this frame (header, body, trailer) into `buf`, returning the
    /// number of bytes written. The header's `size` field is overwritten
    /// to match the true encoded length before it is written out.
    pub fn encode(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let total_len = header::HEADER_LEN + self.body_len() + header::TRAILER_LEN;
        let mut h = *self.header();
        h.size = total_len as u32;
        h.write_to(&mut out)?;
        self.write_body(&mut out)?;
        header::write_trailer(&mut out)?;
        debug_assert_eq!(out.len(), total_len);
        Ok(out)
    }

    fn body_len(&self) -> usize {
        match self {
            Frame::SessionInitStart(_, _) => SessionInitStart::WIRE_LEN,
            Frame::SessionInitReply(_, _) => SessionInitReply::WIRE_LEN,
            Frame::SessionCloseStart(_, _) => SessionCloseStart::WIRE_LEN,
            Frame::SessionCloseReply(_, _) => SessionCloseReply::WIRE_LEN,
            Frame::HeartbeatStart(_) | Frame::HeartbeatReply(_) => 0,
            Frame::Error(_, _) => ErrorBody::WIRE_LEN,
            Frame::Data(_, _, payload) => payload.len(),
            Frame::SubProtocol(_, payload) => payload.len(),
        }
    }

    fn write_body<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Frame::SessionInitStart(_, b) => b.write_to(w),
            Frame::SessionInitReply(_, b) => b.write_to(w),
            Frame::SessionCloseStart(_, b) => b.write_to(w),
            Frame::SessionCloseReply(_, b) => b.write_to(w),
            Frame::HeartbeatStart(_) | Frame::HeartbeatReply(_) => Ok(()),
            Frame::Error(_, b) => b.write_to(w),
            Frame::Data(_, _, payload) => w.write_all(payload),
            Frame::SubProtocol(_, payload) => w.write_all(payload),
        }
    }

    /// Attempts to decode a single frame from the front of `buf`.
    ///
    /// Returns `Ok(Some((frame, consumed)))` on success, `Ok(None)` if
    /// `buf` does not yet hold a complete frame (the caller should read
    /// more bytes and retry without discarding what it has), or `Err` if
    /// the bytes present are malformed beyond recovery.
    pub fn decode(buf: &[u8]) -> Result<Option<(Frame, usize)>, CodecError> {
        let Some(header) = CommonMessageHeader::read_from(buf) else {
            return Ok(None);
        };
        if header.version != header::VERSION {
            return Err(CodecError::BadVersion(header.version));
        }
        let total_len = header.size as usize;
        if total_len < header::HEADER_LEN + header::TRAILER_LEN {
            return Err(CodecError::InvalidMessageSize {
                want_at_least: header::HEADER_LEN + header::TRAILER_LEN,
                got: header.size,
            });
        }
        if buf.len() < total_len {
            return Ok(None);
        }

        let body_start = header::HEADER_LEN;
        let body_end = total_len - header::TRAILER_LEN;
        let body = &buf[body_start..body_end];
        let trailer_bytes = &buf[body_end..total_len];

        let trailer = header::read_trailer(&mut io::Cursor::new(trailer_bytes))
            .map_err(|_| CodecError::ShortRead)?;
        if trailer != header::TRAILER_SENTINEL {
            return Err(CodecError::BadTrailer(trailer));
        }

        let msg_type = MessageType::try_from(header.msg_type).map_err(CodecError::UnknownType)?;
        let frame = decode_body(header, msg_type, body)?;
        Ok(Some((frame, total_len)))
    }
}

fn decode_body(header: CommonMessageHeader, msg_type: MessageType, body: &[u8]) -> Result<Frame, CodecError> {
    let mut cursor = io::Cursor::new(body);
    let too_short = |want: usize| CodecError::InvalidMessageSize { want_at_least: want, got: body.len() as u32 };

    match msg_type {
        MessageType::Session => {
            let sub = SessionSubType::try_from(header.sub_type)
                .map_err(|s| CodecError::UnknownSubType { msg_type: header.msg_type, sub_type: s })?;
            match sub {
                SessionSubType::InitStart => {
                    if body.len() < SessionInitStart::WIRE_LEN {
                        return Err(too_short(SessionInitStart::WIRE_LEN));
                    }
                    let b = SessionInitStart::read_from(&mut cursor).map_err(|_| CodecError::ShortRead)?;
                    Ok(Frame::SessionInitStart(header, b))
                }
                SessionSubType::InitReply => {
                    if body.len() < SessionInitReply::WIRE_LEN {
                        return Err(too_short(SessionInitReply::WIRE_LEN));
                    }
                    let b = SessionInitReply::read_from(&mut cursor).map_err(|_| CodecError::ShortRead)?;
                    Ok(Frame::SessionInitReply(header, b))
                }
                SessionSubType::CloseStart => {
                    if body.len() < SessionCloseStart::WIRE_LEN {
                        return Err(too_short(SessionCloseStart::WIRE_LEN));
                    }
                    let b = SessionCloseStart::read_from(&mut cursor).map_err(|_| CodecError::ShortRead)?;
                    Ok(Frame::SessionCloseStart(header, b))
                }
                SessionSubType::CloseReply => {
                    if body.len() < SessionCloseReply::WIRE_LEN {
                        return Err(too_short(SessionCloseReply::WIRE_LEN));
                    }
                    let b = SessionCloseReply::read_from(&mut cursor).map_err(|_| CodecError::ShortRead)?;
                    Ok(Frame::SessionCloseReply(header, b))
                }
            }
        }
        MessageType::Heartbeat => {
            let sub = HeartbeatSubType::try_from(header.sub_type)
                .map_err(|s| CodecError::UnknownSubType { msg_type: header.msg_type, sub_type: s })?;
            match sub {
                HeartbeatSubType::Start => Ok(Frame::HeartbeatStart(header)),
                HeartbeatSubType::Reply => Ok(Frame::HeartbeatReply(header)),
            }
        }
        MessageType::Error => {
            let _sub = ErrorSubType::try_from(header.sub_type)
                .map_err(|s| CodecError::UnknownSubType { msg_type: header.msg_type, sub_type: s })?;
            if body.len() < ErrorBody::WIRE_LEN {
                return Err(too_short(ErrorBody::WIRE_LEN));
            }
            let b = ErrorBody::read_from(&mut cursor).map_err(|_| CodecError::ShortRead)?;
            Ok(Frame::Error(header, b))
        }
        MessageType::Data => {
            let sub = DataSubType::try_from(header.sub_type)
                .map_err(|s| CodecError::UnknownSubType { msg_type: header.msg_type, sub_type: s })?;
            Ok(Frame::Data(header, sub, body.to_vec()))
        }
        MessageType::SubProtocol => Ok(Frame::SubProtocol(header, body.to_vec())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hdr(msg_type: MessageType, sub_type: u8, reply_required: bool) -> CommonMessageHeader {
        CommonMessageHeader::new(msg_type, sub_type, reply_required, 1, 0, 0)
    }

    #[test]
    fn encode_decode_session_init_start() {
        let frame = Frame::SessionInitStart(
            hdr(MessageType::Session, SessionSubType::InitStart as u8, true),
            SessionInitStart { client_session_id: 99 },
        );
        let bytes = frame.encode().unwrap();
        let (decoded, consumed) = Frame::decode(&bytes).unwrap().unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, frame);
    }

    #[test]
    fn decode_short_buffer_returns_none() {
        let frame = Frame::HeartbeatStart(hdr(MessageType::Heartbeat, HeartbeatSubType::Start as u8, false));
        let bytes = frame.encode().unwrap();
        assert!(Frame::decode(&bytes[..bytes.len() - 1]).unwrap().is_none());
    }

    #[test]
    fn decode_rejects_bad_trailer() {
        let frame = Frame::HeartbeatStart(hdr(MessageType::Heartbeat, HeartbeatSubType::Start as u8, false));
        let mut bytes = frame.encode().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert_eq!(Frame::decode(&bytes).unwrap_err(), CodecError::BadTrailer(u32::from_le_bytes([
            bytes[bytes.len() - 4], bytes[bytes.len() - 3], bytes[bytes.len() - 2], bytes[bytes.len() - 1],
        ])));
    }

    #[test]
    fn decode_rejects_unknown_type() {
        let mut bytes = Frame::HeartbeatStart(hdr(MessageType::Heartbeat, HeartbeatSubType::Start as u8, false))
            .encode()
            .unwrap();
        bytes[1] = 0xEE;
        assert_eq!(Frame::decode(&bytes).unwrap_err(), CodecError::UnknownType(0xEE));
    }

    #[test]
    fn data_frame_round_trips_arbitrary_payload() {
        let frame = Frame::Data(
            hdr(MessageType::Data, DataSubType::Plain as u8, false),
            DataSubType::Plain,
            b"hello session".to_vec(),
        );
        let bytes = frame.encode().unwrap();
        let (decoded, _) = Frame::decode(&bytes).unwrap().unwrap();
        assert_eq!(decoded, frame);
    }
}
