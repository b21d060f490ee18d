//! Per-type sub-type tags. Kept as small `TryFrom<u8>` enums rather than
//! one flat enum so each message-type handler only has to reason about
//! its own sub-protocol, matching §4.7 of the protocol spec.

use std::fmt;

macro_rules! subtype_enum {
    ($name:ident { $($variant:ident = $val:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $val),+
        }

        impl TryFrom<u8> for $name {
            type Error = u8;
            fn try_from(v: u8) -> Result<Self, u8> {
                match v {
                    $($val => Ok($name::$variant),)+
                    other => Err(other),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self)
            }
        }
    };
}

subtype_enum!(SessionSubType {
    InitStart = 1,
    InitReply = 2,
    CloseStart = 3,
    CloseReply = 4,
});

subtype_enum!(HeartbeatSubType {
    Start = 1,
    Reply = 2,
});

subtype_enum!(ErrorSubType {
    FalseVersion = 1,
    UnknownSession = 2,
    InvalidMessageSize = 3,
});

subtype_enum!(DataSubType {
    Plain = 1,
    Reply = 2,
});
