//! # Wire Primitives
//!
//! Encode and decode rules for every primitive data type of the protocol.
//!
//! Each primitive implements [`WireType`]: `decode` returns the value together with
//! the number of bytes it consumed, `encode` returns the number of bytes written.
//! Multi-byte integers and floats are big-endian; VarInt and VarLong use the
//! 7-bits-per-byte little-endian-group encoding.
//!
//! ## Type Map
//! | Protocol type | Rust type |
//! |---|---|
//! | Boolean | `bool` |
//! | Byte / UnsignedByte | `i8` / `u8` |
//! | Short / UnsignedShort | `i16` / `u16` |
//! | Int / Long | `i32` / `i64` |
//! | Float / Double | `f32` / `f64` |
//! | String / Identifier / Chat | `String` |
//! | VarInt / VarLong | [`VarInt`] / [`VarLong`] |
//! | UUID | `uuid::Uuid` |
//! | ByteArray | `Vec<u8>` |
//! | Position | [`Position`] |
//! | Angle | [`Angle`] |
//!
//! [`EntityMetadata`], [`Slot`] and [`NbtTag`] are declared so that packet records
//! can name them, but they are not implemented: encoding or decoding one always
//! returns [`ProtocolError::NotImplemented`].

use crate::error::{ProtocolError, Result};
use std::f64::consts::PI;
use std::io::{self, Read, Write};
use uuid::Uuid;

/// Maximum encoded length of a VarInt in bytes
pub const MAX_VARINT_LEN: usize = 5;

/// Maximum encoded length of a VarLong in bytes
pub const MAX_VARLONG_LEN: usize = 10;

/// A protocol data type with a fixed wire encoding.
pub trait WireType: Sized {
    /// Protocol name of the type, used in error messages
    const NAME: &'static str;

    /// Reads one value from `reader`, returning it with the number of bytes consumed.
    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)>;

    /// Writes the value to `writer`, returning the number of bytes written.
    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize>;
}

#[inline]
fn read_array<const N: usize, R: Read>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

#[inline]
fn write_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<usize> {
    writer.write_all(bytes)?;
    Ok(bytes.len())
}

/// Reads exactly `len` bytes without trusting `len` for the initial allocation.
fn read_exact_vec<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    (&mut *reader).take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buf)
}

/// Converts a decoded length prefix into a buffer length.
pub(crate) fn checked_len(len: i32) -> Result<usize> {
    usize::try_from(len).map_err(|_| ProtocolError::InvalidLength(i64::from(len)))
}

// --- Boolean ---

impl WireType for bool {
    const NAME: &'static str = "Boolean";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let [byte] = read_array::<1, _>(reader)?;
        Ok((byte != 0, 1))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        write_bytes(writer, &[u8::from(*self)])
    }
}

// --- Fixed-width integers ---

macro_rules! fixed_width {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl WireType for $ty {
                const NAME: &'static str = $name;

                fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
                    const WIDTH: usize = std::mem::size_of::<$ty>();
                    let bytes = read_array::<WIDTH, _>(reader)?;
                    Ok((<$ty>::from_be_bytes(bytes), WIDTH))
                }

                fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
                    write_bytes(writer, &self.to_be_bytes())
                }
            }
        )*
    };
}

fixed_width! {
    i8 => "Byte",
    u8 => "UnsignedByte",
    i16 => "Short",
    u16 => "UnsignedShort",
    i32 => "Int",
    i64 => "Long",
}

// --- Floating point ---

impl WireType for f32 {
    const NAME: &'static str = "Float";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let (bits, n) = i32::decode(reader)?;
        Ok((f32::from_bits(bits as u32), n))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        (self.to_bits() as i32).encode(writer)
    }
}

impl WireType for f64 {
    const NAME: &'static str = "Double";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let (bits, n) = i64::decode(reader)?;
        Ok((f64::from_bits(bits as u64), n))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        (self.to_bits() as i64).encode(writer)
    }
}

// --- VarInt ---

/// Variable-length encoding of a two's complement signed 32-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VarInt(pub i32);

impl VarInt {
    /// Builds a VarInt length prefix, rejecting lengths that do not fit in an `i32`.
    pub fn from_len(len: usize) -> Result<Self> {
        i32::try_from(len)
            .map(VarInt)
            .map_err(|_| ProtocolError::InvalidLength(len as i64))
    }

    /// Number of bytes this value occupies on the wire
    pub fn encoded_len(self) -> usize {
        let mut num = self.0 as u32;
        let mut len = 1;
        while num >= 0x80 {
            num >>= 7;
            len += 1;
        }
        len
    }

    /// Encodes into a stack buffer; returns the buffer and the used length.
    pub fn to_bytes(self) -> ([u8; MAX_VARINT_LEN], usize) {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let mut num = self.0 as u32;
        let mut len = 0;
        loop {
            let mut byte = (num & 0x7F) as u8;
            num >>= 7;
            if num != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if num == 0 {
                return (buf, len);
            }
        }
    }
}

impl WireType for VarInt {
    const NAME: &'static str = "VarInt";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let mut value: u32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let [byte] = read_array::<1, _>(reader)?;
            value |= u32::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok((VarInt(value as i32), i + 1));
            }
        }
        Err(ProtocolError::VarIntTooLong)
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let (buf, len) = self.to_bytes();
        write_bytes(writer, &buf[..len])
    }
}

impl From<i32> for VarInt {
    fn from(value: i32) -> Self {
        VarInt(value)
    }
}

impl From<VarInt> for i32 {
    fn from(value: VarInt) -> Self {
        value.0
    }
}

// --- VarLong ---

/// Variable-length encoding of a two's complement signed 64-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VarLong(pub i64);

impl VarLong {
    /// Number of bytes this value occupies on the wire
    pub fn encoded_len(self) -> usize {
        let mut num = self.0 as u64;
        let mut len = 1;
        while num >= 0x80 {
            num >>= 7;
            len += 1;
        }
        len
    }
}

impl WireType for VarLong {
    const NAME: &'static str = "VarLong";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let mut value: u64 = 0;
        for i in 0..MAX_VARLONG_LEN {
            let [byte] = read_array::<1, _>(reader)?;
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok((VarLong(value as i64), i + 1));
            }
        }
        Err(ProtocolError::VarLongTooLong)
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let mut buf = [0u8; MAX_VARLONG_LEN];
        let mut num = self.0 as u64;
        let mut len = 0;
        loop {
            let mut byte = (num & 0x7F) as u8;
            num >>= 7;
            if num != 0 {
                byte |= 0x80;
            }
            buf[len] = byte;
            len += 1;
            if num == 0 {
                break;
            }
        }
        write_bytes(writer, &buf[..len])
    }
}

impl From<i64> for VarLong {
    fn from(value: i64) -> Self {
        VarLong(value)
    }
}

impl From<VarLong> for i64 {
    fn from(value: VarLong) -> Self {
        value.0
    }
}

// --- String ---

/// A namespaced location such as `minecraft:brand`.
pub type Identifier = String;

/// A JSON-encoded rich text component.
pub type Chat = String;

impl WireType for String {
    const NAME: &'static str = "String";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let (len, prefix) = VarInt::decode(reader)?;
        let len = checked_len(len.0)?;
        let bytes = read_exact_vec(reader, len)?;
        Ok((String::from_utf8(bytes)?, prefix + len))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let prefix = VarInt::from_len(self.len())?.encode(writer)?;
        Ok(prefix + write_bytes(writer, self.as_bytes())?)
    }
}

/// Wraps plain text in a chat component: `{"text": "..."}`.
pub fn chat_text(text: &str) -> Chat {
    serde_json::json!({ "text": text }).to_string()
}

/// Serializes a JSON chat component into its wire string.
pub fn chat_from_json(component: &serde_json::Value) -> Result<Chat> {
    Ok(serde_json::to_string(component)?)
}

/// Parses a wire chat string into a JSON component.
pub fn chat_to_json(chat: &str) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(chat)?)
}

// --- ByteArray ---

/// A length-prefixed sequence of opaque bytes.
pub type ByteArray = Vec<u8>;

impl WireType for Vec<u8> {
    const NAME: &'static str = "ByteArray";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let (len, prefix) = VarInt::decode(reader)?;
        let len = checked_len(len.0)?;
        let bytes = read_exact_vec(reader, len)?;
        Ok((bytes, prefix + len))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let prefix = VarInt::from_len(self.len())?.encode(writer)?;
        Ok(prefix + write_bytes(writer, self)?)
    }
}

// --- UUID ---

impl WireType for Uuid {
    const NAME: &'static str = "UUID";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let bytes = read_array::<16, _>(reader)?;
        Ok((Uuid::from_bytes(bytes), 16))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        write_bytes(writer, self.as_bytes())
    }
}

// --- Position ---

/// Block position packed into a single Long: x (26 bits), z (26 bits), y (12 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const MIN_XZ: i32 = -(1 << 25);
    pub const MAX_XZ: i32 = (1 << 25) - 1;
    pub const MIN_Y: i32 = -(1 << 11);
    pub const MAX_Y: i32 = (1 << 11) - 1;

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Unpacks a position from its 64-bit wire form.
    pub fn from_packed(value: i64) -> Self {
        // Arithmetic shifts already carry the sign for x and z.
        let mut x = (value >> 38) as i32;
        let mut y = (value & 0xFFF) as i32;
        let mut z = ((value << 26) >> 38) as i32;

        if x >= 1 << 25 {
            x -= 1 << 26;
        }
        if y >= 1 << 11 {
            y -= 1 << 12;
        }
        if z >= 1 << 25 {
            z -= 1 << 26;
        }

        Self { x, y, z }
    }

    /// Packs the position into its 64-bit wire form, masking each field to its width.
    pub fn to_packed(self) -> i64 {
        ((i64::from(self.x) & 0x3FF_FFFF) << 38)
            | ((i64::from(self.z) & 0x3FF_FFFF) << 12)
            | (i64::from(self.y) & 0xFFF)
    }
}

impl WireType for Position {
    const NAME: &'static str = "Position";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let (packed, n) = i64::decode(reader)?;
        Ok((Position::from_packed(packed), n))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        self.to_packed().encode(writer)
    }
}

// --- Angle ---

/// Rotation angle in steps of 1/256 of a full turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Angle(pub i8);

impl Angle {
    pub fn to_degrees(self) -> f64 {
        360.0 * f64::from(self.0) / 256.0
    }

    pub fn to_radians(self) -> f64 {
        2.0 * PI * f64::from(self.0) / 256.0
    }

    /// Nearest angle step for `degrees`, wrapped into a single turn.
    pub fn from_degrees(degrees: f64) -> Self {
        Angle((degrees * 256.0 / 360.0).round() as i64 as i8)
    }

    /// Nearest angle step for `radians`, wrapped into a single turn.
    pub fn from_radians(radians: f64) -> Self {
        Angle((radians * 256.0 / (2.0 * PI)).round() as i64 as i8)
    }
}

impl WireType for Angle {
    const NAME: &'static str = "Angle";

    fn decode<R: Read>(reader: &mut R) -> Result<(Self, usize)> {
        let (step, n) = i8::decode(reader)?;
        Ok((Angle(step), n))
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        self.0.encode(writer)
    }
}

// --- Unimplemented composites ---

macro_rules! unimplemented_type {
    ($($(#[$meta:meta])* $ty:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            pub struct $ty;

            impl WireType for $ty {
                const NAME: &'static str = stringify!($ty);

                fn decode<R: Read>(_reader: &mut R) -> Result<(Self, usize)> {
                    Err(ProtocolError::NotImplemented(Self::NAME))
                }

                fn encode<W: Write>(&self, _writer: &mut W) -> Result<usize> {
                    Err(ProtocolError::NotImplemented(Self::NAME))
                }
            }
        )*
    };
}

unimplemented_type! {
    /// Miscellaneous information about an entity. Not implemented.
    EntityMetadata,
    /// An item stack in an inventory or container. Not implemented.
    Slot,
    /// A named binary tag tree. Not implemented.
    NbtTag,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn encode_to_vec<T: WireType>(value: &T) -> Vec<u8> {
        let mut buf = Vec::new();
        let written = value.encode(&mut buf).expect("encode");
        assert_eq!(written, buf.len());
        buf
    }

    fn roundtrip<T: WireType + PartialEq + std::fmt::Debug>(value: T) {
        let bytes = encode_to_vec(&value);
        let (decoded, consumed) = T::decode(&mut bytes.as_slice()).expect("decode");
        assert_eq!(decoded, value);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn test_boolean_encoding() {
        assert_eq!(encode_to_vec(&true), vec![0x01]);
        assert_eq!(encode_to_vec(&false), vec![0x00]);
        let (value, n) = bool::decode(&mut &[0x7F][..]).unwrap();
        assert!(value);
        assert_eq!(n, 1);
    }

    #[test]
    fn test_fixed_width_big_endian() {
        assert_eq!(encode_to_vec(&25565u16), vec![0x63, 0xDD]);
        assert_eq!(encode_to_vec(&-2i16), vec![0xFF, 0xFE]);
        assert_eq!(encode_to_vec(&0x0102_0304i32), vec![1, 2, 3, 4]);
        assert_eq!(
            encode_to_vec(&0x0102_0304_0506_0708i64),
            vec![1, 2, 3, 4, 5, 6, 7, 8]
        );
        assert_eq!(encode_to_vec(&-1i8), vec![0xFF]);
        assert_eq!(encode_to_vec(&200u8), vec![200]);
    }

    #[test]
    fn test_float_bit_reinterpretation() {
        assert_eq!(encode_to_vec(&1.0f32), vec![0x3F, 0x80, 0x00, 0x00]);
        assert_eq!(
            encode_to_vec(&-2.5f64),
            vec![0xC0, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        roundtrip(f32::MAX);
        roundtrip(f64::MIN_POSITIVE);
    }

    #[test]
    fn test_varint_boundaries() {
        let cases: [(i32, &[u8]); 6] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (i32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x07]),
            (-1, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
            (i32::MIN, &[0x80, 0x80, 0x80, 0x80, 0x08]),
        ];
        for (value, expected) in cases {
            assert_eq!(encode_to_vec(&VarInt(value)), expected, "value {value}");
            assert_eq!(VarInt(value).encoded_len(), expected.len());
            roundtrip(VarInt(value));
        }
    }

    #[test]
    fn test_varlong_boundaries() {
        let cases: [(i64, usize); 6] = [
            (0, 1),
            (127, 1),
            (128, 2),
            (i64::MAX, 9),
            (-1, 10),
            (i64::MIN, 10),
        ];
        for (value, len) in cases {
            let bytes = encode_to_vec(&VarLong(value));
            assert_eq!(bytes.len(), len, "value {value}");
            assert_eq!(VarLong(value).encoded_len(), len);
            roundtrip(VarLong(value));
        }
    }

    #[test]
    fn test_varint_too_long() {
        let stream = [0xFFu8; 8];
        let mut reader = &stream[..];
        let result = VarInt::decode(&mut reader);
        assert!(matches!(result, Err(ProtocolError::VarIntTooLong)));
        // Only the maximum number of bytes was consumed
        assert_eq!(reader.len(), stream.len() - MAX_VARINT_LEN);
    }

    #[test]
    fn test_varlong_too_long() {
        let stream = [0x80u8; 12];
        let mut reader = &stream[..];
        let result = VarLong::decode(&mut reader);
        assert!(matches!(result, Err(ProtocolError::VarLongTooLong)));
        assert_eq!(reader.len(), stream.len() - MAX_VARLONG_LEN);
    }

    #[test]
    fn test_varint_truncated() {
        let result = VarInt::decode(&mut &[0x80, 0x80][..]);
        assert!(matches!(result, Err(ProtocolError::Io(_))));
    }

    #[test]
    fn test_string_encoding() {
        let bytes = encode_to_vec(&String::from("localhost"));
        assert_eq!(bytes[0], 9);
        assert_eq!(&bytes[1..], b"localhost");
        roundtrip(String::new());
        roundtrip(String::from("héllo wörld ✓"));
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let result = String::decode(&mut &[0x02, 0xC3, 0x28][..]);
        assert!(matches!(result, Err(ProtocolError::InvalidUtf8(_))));
    }

    #[test]
    fn test_string_rejects_negative_length() {
        let result = String::decode(&mut &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F][..]);
        assert!(matches!(result, Err(ProtocolError::InvalidLength(-1))));
    }

    #[test]
    fn test_string_short_read() {
        let result = String::decode(&mut &[0x05, b'a', b'b'][..]);
        match result {
            Err(ProtocolError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_byte_array() {
        let data: ByteArray = vec![0xDE, 0xAD, 0xBE, 0xEF];
        assert_eq!(encode_to_vec(&data), vec![0x04, 0xDE, 0xAD, 0xBE, 0xEF]);
        roundtrip(data);
        roundtrip(ByteArray::new());
    }

    #[test]
    fn test_uuid_raw_bytes() {
        let id = Uuid::from_u128(0x0011_2233_4455_6677_8899_AABB_CCDD_EEFF);
        let bytes = encode_to_vec(&id);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[15], 0xFF);
        roundtrip(id);
    }

    #[test]
    fn test_position_known_value() {
        // Example from the protocol documentation
        let packed: i64 = 0b01000110_00000111_01100011_00101100_00010101_10110100_10000011_00111111;
        let pos = Position::from_packed(packed);
        assert_eq!(pos, Position::new(18_357_644, 831, -20_882_616));
        assert_eq!(pos.to_packed(), packed);
    }

    #[test]
    fn test_position_sign_boundaries() {
        for x in [Position::MIN_XZ, -1, 0, 1, Position::MAX_XZ] {
            for y in [Position::MIN_Y, -1, 0, 1, Position::MAX_Y] {
                for z in [Position::MIN_XZ, -1, 0, 1, Position::MAX_XZ] {
                    roundtrip(Position::new(x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_angle_conversions() {
        assert_eq!(Angle(64).to_degrees(), 90.0);
        assert_eq!(Angle(-128).to_degrees(), -180.0);
        assert!((Angle(64).to_radians() - PI / 2.0).abs() < 1e-12);
        assert_eq!(Angle::from_degrees(90.0), Angle(64));
        assert_eq!(Angle::from_degrees(270.0), Angle(-64));
        assert_eq!(Angle::from_radians(PI), Angle(-128));
        roundtrip(Angle(-37));
    }

    #[test]
    fn test_unimplemented_types_always_fail() {
        let mut sink = Vec::new();
        assert!(matches!(
            EntityMetadata.encode(&mut sink),
            Err(ProtocolError::NotImplemented("EntityMetadata"))
        ));
        assert!(matches!(
            Slot::decode(&mut &[0u8; 4][..]),
            Err(ProtocolError::NotImplemented("Slot"))
        ));
        assert!(matches!(
            NbtTag::decode(&mut &[0u8; 0][..]),
            Err(ProtocolError::NotImplemented("NbtTag"))
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_chat_helpers() {
        let chat = chat_text("Server closed");
        let json = chat_to_json(&chat).unwrap();
        assert_eq!(json["text"], "Server closed");
        assert_eq!(chat_from_json(&json).unwrap(), chat);
        assert!(matches!(chat_to_json("{oops"), Err(ProtocolError::Json(_))));
    }
}
