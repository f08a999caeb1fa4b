//! # Packet Framing
//!
//! Writes a [`RawPacket`] to a byte stream and reads it back, with a VarInt
//! length prefix and optional zlib compression.
//!
//! ## Wire Format
//! ```text
//! packet                     := VarInt(length) frame
//! frame, uncompressed        := VarInt(id) payload
//! frame, compressed, small   := VarInt(0) VarInt(id) payload
//! frame, compressed, large   := VarInt(dataLength) zlib(VarInt(id) payload)
//! ```
//!
//! The layout is selected by the compression threshold: a negative threshold
//! means the connection has not enabled compression; otherwise payloads of at
//! least `threshold` bytes are deflated and smaller ones are sent behind a zero
//! data length.
//!
//! ## Invariants
//! - A compressed frame's `dataLength` is never below the threshold
//! - A compressed frame's `dataLength` never exceeds [`MAX_DATA_LENGTH`]
//! - Short streams are I/O errors; frames are never truncated or padded
//!
//! Every call checks one scratch buffer out of the pool and returns it when the
//! call ends, whatever the outcome. Frame bodies are buffered in full before any
//! field is parsed, so a frame never reads past its declared length.

use crate::config::CodecConfig;
use crate::core::packet::RawPacket;
use crate::core::types::{checked_len, VarInt, WireType};
use crate::error::{ProtocolError, Result};
use crate::utils::buffer_pool::{scratch_pool, BufferPool};
use crate::utils::compression::{
    compress_into, decompress_into, DEFAULT_COMPRESSION_LEVEL, MAX_DATA_LENGTH,
};
use crate::utils::metrics::global_metrics;
use std::io::{self, Read, Write};
use tracing::{debug, instrument, trace};

/// Frames packets for one direction of a connection.
///
/// Holds the negotiated threshold, the zlib level and the scratch pool. Cloning
/// is cheap and clones share the pool.
#[derive(Clone)]
pub struct Framer {
    threshold: i32,
    level: u32,
    pool: BufferPool,
}

impl Framer {
    /// Framer using the shared scratch pool and the default zlib level
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold,
            level: DEFAULT_COMPRESSION_LEVEL,
            pool: scratch_pool().clone(),
        }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.compression.threshold).with_level(config.compression.level)
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_pool(mut self, pool: BufferPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Switches layout, e.g. after a Set Compression packet.
    pub fn set_threshold(&mut self, threshold: i32) {
        self.threshold = threshold;
    }

    /// Writes one framed packet, returning the number of bytes written.
    #[instrument(level = "trace", skip_all, fields(id = packet.id, len = packet.data.len(), threshold = self.threshold))]
    pub fn pack<W: Write>(&self, packet: &RawPacket, writer: &mut W) -> Result<usize> {
        let result = if self.threshold >= 0 {
            self.pack_compressed(packet, writer)
        } else {
            self.pack_uncompressed(packet, writer)
        };

        match result {
            Ok((written, compressed)) => {
                global_metrics().packet_packed(written as u64, compressed);
                trace!(written, compressed, "Packed frame");
                Ok(written)
            }
            Err(e) => {
                if e.is_framing() {
                    global_metrics().framing_error();
                }
                Err(e)
            }
        }
    }

    fn pack_uncompressed<W: Write>(&self, packet: &RawPacket, writer: &mut W) -> Result<(usize, bool)> {
        let mut scratch = self.pool.acquire();
        let (id, id_len) = VarInt(packet.id).to_bytes();

        let length = VarInt::from_len(id_len + packet.data.len())?;
        length.encode(scratch.as_mut())?;
        scratch.extend_from_slice(&id[..id_len]);

        writer.write_all(&scratch)?;
        writer.write_all(&packet.data)?;
        Ok((scratch.len() + packet.data.len(), false))
    }

    fn pack_compressed<W: Write>(&self, packet: &RawPacket, writer: &mut W) -> Result<(usize, bool)> {
        let mut scratch = self.pool.acquire();
        let (id, id_len) = VarInt(packet.id).to_bytes();

        if (packet.data.len() as u64) < self.threshold as u64 {
            VarInt(0).encode(scratch.as_mut())?;
            scratch.extend_from_slice(&id[..id_len]);
            scratch.extend_from_slice(&packet.data);

            let prefix = VarInt::from_len(scratch.len())?.encode(writer)?;
            writer.write_all(&scratch)?;
            return Ok((prefix + scratch.len(), false));
        }

        let uncompressed = id_len + packet.data.len();
        if uncompressed > MAX_DATA_LENGTH {
            return Err(ProtocolError::OversizedPacket {
                size: uncompressed,
                max: MAX_DATA_LENGTH,
            });
        }
        let data_length = VarInt::from_len(uncompressed)?;

        compress_into(&[&id[..id_len], &packet.data], self.level, scratch.as_mut())?;

        let packet_length = VarInt::from_len(data_length.encoded_len() + scratch.len())?;
        let mut written = packet_length.encode(writer)?;
        written += data_length.encode(writer)?;
        writer.write_all(&scratch)?;
        Ok((written + scratch.len(), true))
    }

    /// Reads one framed packet.
    #[instrument(level = "trace", skip_all, fields(threshold = self.threshold))]
    pub fn unpack<R: Read>(&self, reader: &mut R) -> Result<RawPacket> {
        let result = if self.threshold >= 0 {
            self.unpack_compressed(reader)
        } else {
            self.unpack_uncompressed(reader)
        };

        match result {
            Ok((packet, read, compressed)) => {
                global_metrics().packet_unpacked(read as u64, compressed);
                trace!(id = packet.id, len = packet.data.len(), compressed, "Unpacked frame");
                Ok(packet)
            }
            Err(e) => {
                if e.is_framing() {
                    global_metrics().framing_error();
                    debug!(error = %e, "Rejected frame");
                }
                Err(e)
            }
        }
    }

    fn unpack_uncompressed<R: Read>(&self, reader: &mut R) -> Result<(RawPacket, usize, bool)> {
        let (length, prefix_len) = VarInt::decode(reader)?;
        let length = checked_len(length.0)?;

        let mut scratch = self.pool.acquire();
        read_frame(reader, length, scratch.as_mut())?;

        let mut frame: &[u8] = &scratch;
        let (id, _) = VarInt::decode(&mut frame)?;
        Ok((RawPacket::new(id.0, frame.to_vec()), prefix_len + length, false))
    }

    fn unpack_compressed<R: Read>(&self, reader: &mut R) -> Result<(RawPacket, usize, bool)> {
        let (length, prefix_len) = VarInt::decode(reader)?;
        let length = checked_len(length.0)?;

        let mut scratch = self.pool.acquire();
        read_frame(reader, length, scratch.as_mut())?;

        let mut frame: &[u8] = &scratch;
        let (data_length, _) = VarInt::decode(&mut frame)?;

        if data_length.0 == 0 {
            let (id, _) = VarInt::decode(&mut frame)?;
            let packet = RawPacket::new(id.0, frame.to_vec());
            return Ok((packet, prefix_len + length, false));
        }

        if data_length.0 < self.threshold {
            return Err(ProtocolError::BelowThreshold {
                size: data_length.0,
                threshold: self.threshold,
            });
        }
        let data_length = checked_len(data_length.0)?;
        if data_length > MAX_DATA_LENGTH {
            return Err(ProtocolError::OversizedPacket {
                size: data_length,
                max: MAX_DATA_LENGTH,
            });
        }

        let mut inflated = Vec::new();
        // one byte past the declared length exposes bodies that inflate too far
        let n = decompress_into(frame, data_length + 1, &mut inflated)?;
        if n < data_length {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        if n > data_length {
            return Err(ProtocolError::DataLengthMismatch {
                declared: data_length,
            });
        }

        let mut body: &[u8] = &inflated;
        let (id, id_len) = VarInt::decode(&mut body)?;
        inflated.drain(..id_len);

        Ok((RawPacket::new(id.0, inflated), prefix_len + length, true))
    }
}

/// Buffers exactly `length` bytes of frame body into `out`.
fn read_frame<R: Read>(reader: &mut R, length: usize, out: &mut Vec<u8>) -> Result<()> {
    (&mut *reader).take(length as u64).read_to_end(out)?;
    if out.len() < length {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(())
}

impl RawPacket {
    /// Writes the packet to `writer` using the layout selected by `threshold`.
    pub fn pack<W: Write>(&self, writer: &mut W, threshold: i32) -> Result<()> {
        Framer::new(threshold).pack(self, writer).map(|_| ())
    }

    /// Reads one packet from `reader` using the layout selected by `threshold`.
    pub fn unpack<R: Read>(reader: &mut R, threshold: i32) -> Result<RawPacket> {
        Framer::new(threshold).unpack(reader)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::utils::compression::compress;

    fn packed(packet: &RawPacket, threshold: i32) -> Vec<u8> {
        let mut out = Vec::new();
        packet.pack(&mut out, threshold).expect("pack");
        out
    }

    fn frame(data_length: i32, body: &[u8]) -> Vec<u8> {
        let mut inner = Vec::new();
        VarInt(data_length).encode(&mut inner).unwrap();
        inner.extend_from_slice(body);
        let mut out = Vec::new();
        VarInt::from_len(inner.len()).unwrap().encode(&mut out).unwrap();
        out.extend_from_slice(&inner);
        out
    }

    #[test]
    fn test_uncompressed_layout() {
        let packet = RawPacket::new(0x2A, vec![1, 2, 3]);
        assert_eq!(packed(&packet, -1), vec![0x04, 0x2A, 1, 2, 3]);
    }

    #[test]
    fn test_uncompressed_multibyte_id() {
        let packet = RawPacket::new(300, vec![9; 4]);
        let bytes = packed(&packet, -1);
        assert_eq!(&bytes[..3], &[0x06, 0xAC, 0x02]);
        let decoded = RawPacket::unpack(&mut bytes.as_slice(), -1).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_handshake_bytes() {
        let mut data = Vec::new();
        VarInt(754).encode(&mut data).unwrap();
        String::from("localhost").encode(&mut data).unwrap();
        25565u16.encode(&mut data).unwrap();
        VarInt(2).encode(&mut data).unwrap();
        let packet = RawPacket::new(0x00, data);

        let mut expected = vec![0x10, 0x00, 0xF2, 0x05, 0x09];
        expected.extend_from_slice(b"localhost");
        expected.extend_from_slice(&[0x63, 0xDD, 0x02]);
        assert_eq!(packed(&packet, -1), expected);
    }

    #[test]
    fn test_compressed_small_uses_zero_sentinel() {
        let packet = RawPacket::new(0x01, vec![0xAB; 3]);
        let bytes = packed(&packet, 256);
        assert_eq!(bytes, vec![0x05, 0x00, 0x01, 0xAB, 0xAB, 0xAB]);
        assert_eq!(RawPacket::unpack(&mut bytes.as_slice(), 256).unwrap(), packet);
    }

    #[test]
    fn test_threshold_boundaries_roundtrip() {
        let threshold = 256;
        for len in [0usize, threshold as usize - 1, threshold as usize, 4096] {
            let packet = RawPacket::new(0x22, (0..len).map(|i| (i % 251) as u8).collect());
            let bytes = packed(&packet, threshold);

            let mut reader = bytes.as_slice();
            let (_, prefix) = VarInt::decode(&mut reader).unwrap();
            let (data_length, _) = VarInt::decode(&mut reader).unwrap();
            if len < threshold as usize {
                assert_eq!(data_length.0, 0, "len {len} should not be compressed");
            } else {
                assert_eq!(data_length.0 as usize, len + 1, "len {len} should be compressed");
            }
            assert!(prefix <= 3);

            let decoded = RawPacket::unpack(&mut bytes.as_slice(), threshold).unwrap();
            assert_eq!(decoded, packet);
        }
    }

    #[test]
    fn test_threshold_zero_compresses_everything() {
        let packet = RawPacket::new(0x00, Vec::new());
        let bytes = packed(&packet, 0);
        // dataLength is 1: only the id byte
        assert_eq!(bytes[1], 0x01);
        assert_eq!(RawPacket::unpack(&mut bytes.as_slice(), 0).unwrap(), packet);
    }

    #[test]
    fn test_reject_below_threshold() {
        let body = compress(&[0x00; 10], 6).unwrap();
        let bytes = frame(10, &body);
        let result = RawPacket::unpack(&mut bytes.as_slice(), 256);
        assert!(matches!(
            result,
            Err(ProtocolError::BelowThreshold {
                size: 10,
                threshold: 256
            })
        ));
    }

    #[test]
    fn test_reject_above_maximum() {
        let body = compress(&[0x00; 16], 6).unwrap();
        let bytes = frame(MAX_DATA_LENGTH as i32 + 1, &body);
        let result = RawPacket::unpack(&mut bytes.as_slice(), 256);
        assert!(matches!(
            result,
            Err(ProtocolError::OversizedPacket { size, .. }) if size == MAX_DATA_LENGTH + 1
        ));
    }

    #[test]
    fn test_inflated_shorter_than_declared() {
        let body = compress(&[0x07; 300], 6).unwrap();
        let bytes = frame(400, &body);
        match RawPacket::unpack(&mut bytes.as_slice(), 256) {
            Err(ProtocolError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_inflated_longer_than_declared() {
        let mut body = vec![0x05];
        body.extend_from_slice(&[0x2C; 4999]);
        let bytes = frame(300, &compress(&body, 6).unwrap());
        match RawPacket::unpack(&mut bytes.as_slice(), 256) {
            Err(ProtocolError::DataLengthMismatch { declared }) => assert_eq!(declared, 300),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_inflated_exactly_declared() {
        let mut body = vec![0x05];
        body.extend_from_slice(&[0x2C; 299]);
        let bytes = frame(300, &compress(&body, 6).unwrap());
        let packet = RawPacket::unpack(&mut bytes.as_slice(), 256).unwrap();
        assert_eq!(packet, RawPacket::new(0x05, vec![0x2C; 299]));
    }

    #[test]
    fn test_truncated_stream_is_io_error() {
        let packet = RawPacket::new(0x05, vec![1; 40]);
        for threshold in [-1, 256] {
            let bytes = packed(&packet, threshold);
            let truncated = &bytes[..bytes.len() - 1];
            let result = RawPacket::unpack(&mut &truncated[..], threshold);
            assert!(matches!(result, Err(ProtocolError::Io(_))), "threshold {threshold}");
        }
    }

    #[test]
    fn test_length_shorter_than_id() {
        // the id VarInt runs past the declared frame length
        let bytes = [0x01, 0x80, 0x01];
        match RawPacket::unpack(&mut &bytes[..], -1) {
            Err(ProtocolError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_uncompressed_frame_consumes_only_its_length() {
        let bytes = [0x02, 0x07, 0xAA, 0xBB];
        let mut reader = &bytes[..];
        let packet = RawPacket::unpack(&mut reader, -1).unwrap();
        assert_eq!(packet, RawPacket::new(0x07, vec![0xAA]));
        assert_eq!(reader, &[0xBB]);
    }

    #[test]
    fn test_negative_packet_length() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 0x00];
        let result = RawPacket::unpack(&mut &bytes[..], 256);
        assert!(matches!(result, Err(ProtocolError::InvalidLength(-1))));
    }

    #[test]
    fn test_consecutive_frames_on_one_stream() {
        let framer = Framer::new(64).with_level(1);
        let packets = [
            RawPacket::new(0x00, vec![]),
            RawPacket::new(0x01, vec![5; 63]),
            RawPacket::new(0x02, vec![6; 64]),
            RawPacket::new(0x7F, vec![7; 1000]),
        ];
        let mut stream = Vec::new();
        for packet in &packets {
            framer.pack(packet, &mut stream).unwrap();
        }

        let mut reader = stream.as_slice();
        for packet in &packets {
            assert_eq!(&framer.unpack(&mut reader).unwrap(), packet);
        }
        assert!(reader.is_empty());
    }

    #[test]
    fn test_pack_returns_written_len() {
        let framer = Framer::new(16);
        for len in [0usize, 15, 16, 500] {
            let mut out = Vec::new();
            let written = framer.pack(&RawPacket::new(3, vec![1; len]), &mut out).unwrap();
            assert_eq!(written, out.len());
        }
    }

    #[test]
    fn test_scratch_returned_after_failure() {
        let pool = BufferPool::new(2);
        let framer = Framer::new(256).with_pool(pool.clone());

        let body = compress(&[0x00; 10], 6).unwrap();
        let bytes = frame(10, &body);
        assert!(framer.unpack(&mut bytes.as_slice()).is_err());
        assert_eq!(pool.available(), 2);

        let mut sink = Vec::new();
        framer.pack(&RawPacket::new(1, vec![0; 300]), &mut sink).unwrap();
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_set_threshold_switches_layout() {
        let mut framer = Framer::new(-1);
        let packet = RawPacket::new(0x03, vec![0; 4]);
        let mut plain = Vec::new();
        framer.pack(&packet, &mut plain).unwrap();

        framer.set_threshold(2);
        assert_eq!(framer.threshold(), 2);
        let mut compressed = Vec::new();
        framer.pack(&packet, &mut compressed).unwrap();
        assert_ne!(plain, compressed);
        assert_eq!(framer.unpack(&mut compressed.as_slice()).unwrap(), packet);
    }
}
