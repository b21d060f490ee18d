//! Wire framing for sessionkit: the common message header/trailer and the
//! per-type message bodies, with no knowledge of sockets, threads, or
//! session bookkeeping. `sessionkit` builds the actual engine on top of
//! this crate.

pub mod body;
pub mod error;
pub mod frame;
pub mod header;
pub mod subtype;

pub use body::{ErrorBody, SessionCloseReply, SessionCloseStart, SessionInitReply, SessionInitStart};
pub use error::CodecError;
pub use frame::Frame;
pub use header::{CommonMessageHeader, MessageType, HEADER_LEN, TRAILER_LEN, TRAILER_SENTINEL, VERSION};
pub use subtype::{DataSubType, ErrorSubType, HeartbeatSubType, SessionSubType};
