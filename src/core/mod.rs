//! # Core Protocol Components
//!
//! Primitive wire types, the untyped packet envelope, and packet framing.
//!
//! ## Components
//! - **Types**: encode/decode rules for every primitive data type
//! - **Value**: closed tagged union over the primitives for dynamic marshaling
//! - **Packet**: `RawPacket`, field readers/writers and the `Packet` trait
//! - **Frame**: length-prefixed framing with optional zlib compression
//! - **Codec**: Tokio codec for framing over async byte streams
//!
//! ## Wire Format
//! ```text
//! [VarInt length] [VarInt dataLength]? [VarInt id] [payload]
//! ```
//! `dataLength` is present only once compression is enabled; when it is non-zero,
//! id and payload are zlib-compressed.
//!
//! ## Security
//! - VarInt/VarLong decoding stops at 5/10 bytes
//! - Decompressed packets are capped at 2 MiB
//! - Length prefixes never drive an up-front allocation

pub mod codec;
pub mod frame;
pub mod packet;
pub mod types;
pub mod value;
