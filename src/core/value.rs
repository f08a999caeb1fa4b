//! Tagged values over the closed set of wire primitives.
//!
//! [`Kind`] names a primitive type and [`Value`] carries one decoded value of it.
//! Both enums dispatch statically to the [`WireType`] implementations in
//! [`crate::core::types`], which lets a packet layout be described as a plain
//! `&[Kind]` slice.

use crate::core::types::{
    Angle, EntityMetadata, NbtTag, Position, Slot, VarInt, VarLong, WireType,
};
use crate::error::{ProtocolError, Result};
use std::io::{Read, Write};
use uuid::Uuid;

/// Every primitive type the codec knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Boolean,
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    Long,
    Float,
    Double,
    String,
    VarInt,
    VarLong,
    Uuid,
    ByteArray,
    Position,
    Angle,
    EntityMetadata,
    Slot,
    NbtTag,
}

impl Kind {
    /// Protocol name of the type
    pub fn name(self) -> &'static str {
        match self {
            Kind::Boolean => bool::NAME,
            Kind::Byte => i8::NAME,
            Kind::UnsignedByte => u8::NAME,
            Kind::Short => i16::NAME,
            Kind::UnsignedShort => u16::NAME,
            Kind::Int => i32::NAME,
            Kind::Long => i64::NAME,
            Kind::Float => f32::NAME,
            Kind::Double => f64::NAME,
            Kind::String => String::NAME,
            Kind::VarInt => VarInt::NAME,
            Kind::VarLong => VarLong::NAME,
            Kind::Uuid => Uuid::NAME,
            Kind::ByteArray => <Vec<u8>>::NAME,
            Kind::Position => Position::NAME,
            Kind::Angle => Angle::NAME,
            Kind::EntityMetadata => EntityMetadata::NAME,
            Kind::Slot => Slot::NAME,
            Kind::NbtTag => NbtTag::NAME,
        }
    }

    /// Whether values of this kind can be encoded and decoded at all
    pub fn is_implemented(self) -> bool {
        !matches!(self, Kind::EntityMetadata | Kind::Slot | Kind::NbtTag)
    }
}

/// One decoded primitive value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Byte(i8),
    UnsignedByte(u8),
    Short(i16),
    UnsignedShort(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    VarInt(i32),
    VarLong(i64),
    Uuid(Uuid),
    ByteArray(Vec<u8>),
    Position(Position),
    Angle(Angle),
    EntityMetadata(EntityMetadata),
    Slot(Slot),
    NbtTag(NbtTag),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Boolean(_) => Kind::Boolean,
            Value::Byte(_) => Kind::Byte,
            Value::UnsignedByte(_) => Kind::UnsignedByte,
            Value::Short(_) => Kind::Short,
            Value::UnsignedShort(_) => Kind::UnsignedShort,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::String(_) => Kind::String,
            Value::VarInt(_) => Kind::VarInt,
            Value::VarLong(_) => Kind::VarLong,
            Value::Uuid(_) => Kind::Uuid,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::Position(_) => Kind::Position,
            Value::Angle(_) => Kind::Angle,
            Value::EntityMetadata(_) => Kind::EntityMetadata,
            Value::Slot(_) => Kind::Slot,
            Value::NbtTag(_) => Kind::NbtTag,
        }
    }

    /// Decodes one value of `kind`, returning it with the number of bytes consumed.
    pub fn decode<R: Read>(kind: Kind, reader: &mut R) -> Result<(Self, usize)> {
        fn wrap<T: WireType, R: Read>(
            reader: &mut R,
            variant: fn(T) -> Value,
        ) -> Result<(Value, usize)> {
            let (value, n) = T::decode(reader)?;
            Ok((variant(value), n))
        }

        match kind {
            Kind::Boolean => wrap(reader, Value::Boolean),
            Kind::Byte => wrap(reader, Value::Byte),
            Kind::UnsignedByte => wrap(reader, Value::UnsignedByte),
            Kind::Short => wrap(reader, Value::Short),
            Kind::UnsignedShort => wrap(reader, Value::UnsignedShort),
            Kind::Int => wrap(reader, Value::Int),
            Kind::Long => wrap(reader, Value::Long),
            Kind::Float => wrap(reader, Value::Float),
            Kind::Double => wrap(reader, Value::Double),
            Kind::String => wrap(reader, Value::String),
            Kind::VarInt => wrap(reader, |v: VarInt| Value::VarInt(v.0)),
            Kind::VarLong => wrap(reader, |v: VarLong| Value::VarLong(v.0)),
            Kind::Uuid => wrap(reader, Value::Uuid),
            Kind::ByteArray => wrap(reader, Value::ByteArray),
            Kind::Position => wrap(reader, Value::Position),
            Kind::Angle => wrap(reader, Value::Angle),
            Kind::EntityMetadata => wrap(reader, Value::EntityMetadata),
            Kind::Slot => wrap(reader, Value::Slot),
            Kind::NbtTag => wrap(reader, Value::NbtTag),
        }
    }

    /// Encodes the value, returning the number of bytes written.
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<usize> {
        match self {
            Value::Boolean(v) => v.encode(writer),
            Value::Byte(v) => v.encode(writer),
            Value::UnsignedByte(v) => v.encode(writer),
            Value::Short(v) => v.encode(writer),
            Value::UnsignedShort(v) => v.encode(writer),
            Value::Int(v) => v.encode(writer),
            Value::Long(v) => v.encode(writer),
            Value::Float(v) => v.encode(writer),
            Value::Double(v) => v.encode(writer),
            Value::String(v) => v.encode(writer),
            Value::VarInt(v) => VarInt(*v).encode(writer),
            Value::VarLong(v) => VarLong(*v).encode(writer),
            Value::Uuid(v) => v.encode(writer),
            Value::ByteArray(v) => v.encode(writer),
            Value::Position(v) => v.encode(writer),
            Value::Angle(v) => v.encode(writer),
            Value::EntityMetadata(v) => v.encode(writer),
            Value::Slot(v) => v.encode(writer),
            Value::NbtTag(v) => v.encode(writer),
        }
    }

    fn mismatch(&self, expected: Kind) -> ProtocolError {
        ProtocolError::UnexpectedKind {
            expected: expected.name(),
            actual: self.kind().name(),
        }
    }

    pub fn as_var_int(&self) -> Result<i32> {
        match self {
            Value::VarInt(v) => Ok(*v),
            other => Err(other.mismatch(Kind::VarInt)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(v) => Ok(v),
            other => Err(other.mismatch(Kind::String)),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Value::ByteArray(v) => Ok(v),
            other => Err(other.mismatch(Kind::ByteArray)),
        }
    }

    pub fn as_long(&self) -> Result<i64> {
        match self {
            Value::Long(v) => Ok(*v),
            other => Err(other.mismatch(Kind::Long)),
        }
    }
}
