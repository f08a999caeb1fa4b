//! zlib compression for packet frames.
//!
//! Compressed frames carry a zlib stream (RFC 1950) of `VarInt(id) ++ payload`.
//! Inflation is bounded: output never grows past the caller's limit, which the
//! framing layer sets from the frame's declared data length.

use crate::error::{ProtocolError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use tracing::trace;

/// Maximum decompressed size of a packet (`VarInt(id)` plus payload)
pub const MAX_DATA_LENGTH: usize = 2_097_152;

/// Default zlib compression level
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Highest valid zlib compression level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Compresses `parts` as one contiguous zlib stream and appends it to `out`.
///
/// # Errors
/// Returns `ProtocolError::CompressionFailure` if the encoder fails
pub fn compress_into(parts: &[&[u8]], level: u32, out: &mut Vec<u8>) -> Result<()> {
    let start = out.len();
    let mut encoder = ZlibEncoder::new(out, Compression::new(level));
    for part in parts {
        encoder
            .write_all(part)
            .map_err(|_| ProtocolError::CompressionFailure)?;
    }
    let out = encoder
        .finish()
        .map_err(|_| ProtocolError::CompressionFailure)?;
    trace!(compressed = out.len() - start, level, "zlib stream written");
    Ok(())
}

/// Compresses `data` into a fresh buffer.
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress_into(&[data], level, &mut out)?;
    Ok(out)
}

/// Inflates `data` into `out`, producing at most `limit` bytes.
///
/// Returns the number of bytes appended. Output beyond `limit` is not read.
///
/// # Errors
/// Returns `ProtocolError::DecompressionFailure` if the stream is malformed
pub fn decompress_into(data: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<usize> {
    let start = out.len();
    ZlibDecoder::new(data)
        .take(limit as u64)
        .read_to_end(out)
        .map_err(|_| ProtocolError::DecompressionFailure)?;
    Ok(out.len() - start)
}

/// Inflates `data` into a fresh buffer, capped at [`MAX_DATA_LENGTH`].
///
/// # Errors
/// Returns `ProtocolError::DecompressionFailure` if the stream is malformed or
/// inflates past [`MAX_DATA_LENGTH`]
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let n = decompress_into(data, MAX_DATA_LENGTH + 1, &mut out)?;
    if n > MAX_DATA_LENGTH {
        return Err(ProtocolError::DecompressionFailure);
    }
    Ok(out)
}
