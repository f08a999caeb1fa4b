//! # Packet Catalogue
//!
//! Typed records for the packets exchanged before the play state, targeting
//! protocol version 754. Every record implements [`Packet`]: fields are written
//! and read in declaration order with the primitive codec, and `from_raw` rejects
//! a frame carrying another id before decoding anything.
//!
//! ## States
//! - **handshake**: the first packet of every connection
//! - **status**: server list ping
//! - **login**: authentication, encryption and compression negotiation
//!
//! Ids are only unique within one state and direction, so callers pick the
//! record from the connection state they are tracking.
//!
//! [`Packet`]: crate::core::packet::Packet

/// Declares a packet record and its [`Packet`](crate::core::packet::Packet) impl.
///
/// Each field type must implement [`WireType`](crate::core::types::WireType).
macro_rules! packet {
    (
        $(#[$meta:meta])*
        $name:ident = $id:literal {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        impl $crate::core::packet::Packet for $name {
            const ID: i32 = $id;

            fn to_raw(&self) -> $crate::error::Result<$crate::core::packet::RawPacket> {
                #[allow(unused_mut)]
                let mut writer = $crate::core::packet::FieldWriter::new();
                $( writer.write(&self.$field)?; )*
                Ok(writer.finish(Self::ID))
            }

            fn from_raw(raw: &$crate::core::packet::RawPacket) -> $crate::error::Result<Self> {
                $crate::core::packet::check_id(Self::ID, raw)?;
                #[allow(unused_mut, unused_variables)]
                let mut reader = raw.fields();
                Ok(Self {
                    $( $field: reader.read()?, )*
                })
            }
        }
    };
}

pub mod handshake;
pub mod login;
pub mod status;
