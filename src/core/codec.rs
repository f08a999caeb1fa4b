//! Tokio codec for framing packets over async byte streams.
//!
//! Wraps [`Framer`] so that a `tokio_util::codec::Framed` transport yields and
//! accepts [`RawPacket`]s. Decoding waits until the whole frame is buffered, then
//! splits it off and unpacks it synchronously.

use crate::config::CodecConfig;
use crate::core::frame::Framer;
use crate::core::packet::RawPacket;
use crate::core::types::{checked_len, VarInt, WireType, MAX_VARINT_LEN};
use crate::error::{ProtocolError, Result};
use bytes::{BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// Largest frame length a 3-byte VarInt prefix can carry
pub const MAX_PACKET_LENGTH: usize = 2_097_151;

#[derive(Clone)]
pub struct PacketCodec {
    framer: Framer,
}

impl PacketCodec {
    pub fn new(threshold: i32) -> Self {
        Self {
            framer: Framer::new(threshold),
        }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            framer: Framer::from_config(config),
        }
    }

    pub fn with_framer(framer: Framer) -> Self {
        Self { framer }
    }

    pub fn threshold(&self) -> i32 {
        self.framer.threshold()
    }

    /// Applies a negotiated compression threshold to subsequent frames.
    pub fn set_threshold(&mut self, threshold: i32) {
        self.framer.set_threshold(threshold);
    }
}

impl Default for PacketCodec {
    fn default() -> Self {
        Self::new(crate::config::COMPRESSION_DISABLED)
    }
}

impl Decoder for PacketCodec {
    type Item = RawPacket;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        let mut peek: &[u8] = src;
        let (length, prefix_len) = match VarInt::decode(&mut peek) {
            Ok(decoded) => decoded,
            Err(ProtocolError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Ok(None)
            }
            Err(e) => return Err(e),
        };

        let length = checked_len(length.0)?;
        if length > MAX_PACKET_LENGTH {
            return Err(ProtocolError::OversizedPacket {
                size: length,
                max: MAX_PACKET_LENGTH,
            });
        }

        let frame_len = prefix_len + length;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_len);
        trace!(frame_len, "Decoding buffered frame");
        self.framer.unpack(&mut &frame[..]).map(Some)
    }
}

impl Encoder<RawPacket> for PacketCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: RawPacket, dst: &mut BytesMut) -> Result<()> {
        <Self as Encoder<&RawPacket>>::encode(self, &item, dst)
    }
}

impl Encoder<&RawPacket> for PacketCodec {
    type Error = ProtocolError;

    /// Appends one frame to `dst`.
    ///
    /// Frames longer than [`MAX_PACKET_LENGTH`] are rejected and `dst` is left as
    /// it was, so a peer never receives a frame its decoder must refuse.
    fn encode(&mut self, item: &RawPacket, dst: &mut BytesMut) -> Result<()> {
        let start = dst.len();
        dst.reserve(item.data.len() + 2 * MAX_VARINT_LEN);

        let packed = self.framer.pack(item, &mut (&mut *dst).writer());
        let written = match packed {
            Ok(written) => written,
            Err(e) => {
                dst.truncate(start);
                return Err(e);
            }
        };

        let mut frame: &[u8] = &dst[start..];
        let (_, prefix_len) = VarInt::decode(&mut frame)?;
        let length = written - prefix_len;
        if length > MAX_PACKET_LENGTH {
            dst.truncate(start);
            return Err(ProtocolError::OversizedPacket {
                size: length,
                max: MAX_PACKET_LENGTH,
            });
        }
        Ok(())
    }
}
