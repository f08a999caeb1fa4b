//! # Packet Envelope
//!
//! [`RawPacket`] is an untyped packet: a numeric id plus opaque payload bytes.
//! Payloads are built and read by sequential composition of primitive codec
//! calls, either dynamically through [`Kind`]/[`Value`] slices or statically
//! through [`FieldWriter`] and [`FieldReader`].
//!
//! Typed packet records implement [`Packet`]. A record's `from_raw` must reject a
//! `RawPacket` carrying a different id before decoding any field; [`check_id`] does
//! exactly that.
//!
//! Framing (length prefix and compression) lives in [`crate::core::frame`].

use crate::core::types::WireType;
use crate::core::value::{Kind, Value};
use crate::error::{ProtocolError, Result};

/// An unstructured packet that carries an id and raw payload bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPacket {
    pub id: i32,
    pub data: Vec<u8>,
}

impl RawPacket {
    pub fn new(id: i32, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    /// Encodes `values` in order into a new packet payload.
    ///
    /// The first failing value aborts the whole payload.
    pub fn marshal(id: i32, values: &[Value]) -> Result<Self> {
        let mut data = Vec::new();
        for value in values {
            value.encode(&mut data)?;
        }
        Ok(Self { id, data })
    }

    /// Decodes one value per entry of `kinds` from the payload, in order.
    ///
    /// Bytes left over after the last value are ignored.
    pub fn unmarshal(&self, kinds: &[Kind]) -> Result<Vec<Value>> {
        let mut reader = self.fields();
        kinds.iter().map(|&kind| reader.read_value(kind)).collect()
    }

    /// Sequential typed reader over the payload
    pub fn fields(&self) -> FieldReader<'_> {
        FieldReader::new(&self.data)
    }
}

/// Cursor that decodes consecutive fields from a payload.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    remaining: &'a [u8],
    consumed: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            remaining: data,
            consumed: 0,
        }
    }

    /// Decodes the next field as `T`.
    pub fn read<T: WireType>(&mut self) -> Result<T> {
        let (value, n) = T::decode(&mut self.remaining)?;
        self.consumed += n;
        Ok(value)
    }

    /// Decodes the next field as a tagged value of `kind`.
    pub fn read_value(&mut self, kind: Kind) -> Result<Value> {
        let (value, n) = Value::decode(kind, &mut self.remaining)?;
        self.consumed += n;
        Ok(value)
    }

    /// Bytes consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        self.remaining
    }
}

/// Appends consecutive fields to a payload.
#[derive(Debug, Default, Clone)]
pub struct FieldWriter {
    data: Vec<u8>,
}

impl FieldWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `value` after the fields written so far.
    pub fn write<T: WireType>(&mut self, value: &T) -> Result<&mut Self> {
        value.encode(&mut self.data)?;
        Ok(self)
    }

    pub fn write_value(&mut self, value: &Value) -> Result<&mut Self> {
        value.encode(&mut self.data)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Finishes the payload as a packet with the given id.
    pub fn finish(self, id: i32) -> RawPacket {
        RawPacket::new(id, self.data)
    }
}

/// A structured packet record that converts to and from a [`RawPacket`].
pub trait Packet: Sized {
    /// Packet id on the wire
    const ID: i32;

    /// Marshals the record into a raw packet carrying [`Self::ID`].
    fn to_raw(&self) -> Result<RawPacket>;

    /// Unmarshals the record, failing with [`ProtocolError::WrongPacketId`] when
    /// `raw.id` differs from [`Self::ID`].
    fn from_raw(raw: &RawPacket) -> Result<Self>;
}

/// Rejects a raw packet whose id is not `expected`.
#[inline]
pub fn check_id(expected: i32, raw: &RawPacket) -> Result<()> {
    if raw.id == expected {
        Ok(())
    } else {
        Err(ProtocolError::WrongPacketId {
            expected,
            actual: raw.id,
        })
    }
}
