//! # mc-protocol
//!
//! Wire-level codec for the Minecraft Java Edition protocol: primitive data
//! types, untyped packets, and length-prefixed framing with optional zlib
//! compression.
//!
//! ## Example
//! ```rust
//! use mc_protocol::core::packet::{Packet, RawPacket};
//! use mc_protocol::protocol::handshake::{Handshake, NEXT_STATE_STATUS};
//!
//! let handshake = Handshake::new("localhost", 25565, NEXT_STATE_STATUS);
//!
//! let mut wire = Vec::new();
//! handshake.to_raw()?.pack(&mut wire, -1)?;
//!
//! let raw = RawPacket::unpack(&mut wire.as_slice(), -1)?;
//! assert_eq!(Handshake::from_raw(&raw)?, handshake);
//! # Ok::<(), mc_protocol::error::ProtocolError>(())
//! ```
//!
//! ## Modules
//! - [`core`]: primitives, packets, framing and the Tokio codec
//! - [`protocol`]: typed handshake, status and login packets
//! - [`config`]: codec configuration
//! - [`utils`]: buffer pool, compression, logging and metrics
//! - [`error`]: error types

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::codec::PacketCodec;
pub use crate::core::frame::Framer;
pub use crate::core::packet::{Packet, RawPacket};
pub use crate::core::types::{Angle, Position, VarInt, VarLong, WireType};
pub use crate::core::value::{Kind, Value};
pub use crate::error::{ProtocolError, Result};
