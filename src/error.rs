//! # Error Types
//!
//! Error handling for the primitive codec and the packet framing layer.
//!
//! Every operation in this crate fails fast: the first error aborts the current
//! encode, decode, pack or unpack call and is returned to the caller unchanged.
//! Nothing is retried internally.
//!
//! ## Error Categories
//! - **I/O Errors**: the underlying reader or writer failed, or a stream ended early
//! - **Encoding-limit Errors**: a VarInt or VarLong ran past its maximum byte count
//! - **Unimplemented Types**: a placeholder composite type was encoded or decoded
//! - **Framing Errors**: a compressed frame broke the threshold or size invariants
//! - **Identity Errors**: a packet record was decoded from a frame with another id
//!
//! ## Example Usage
//! ```rust
//! use mc_protocol::core::packet::RawPacket;
//! use mc_protocol::error::ProtocolError;
//! use tracing::{error, info};
//!
//! let mut stream: &[u8] = &[0x02, 0x00];
//! match RawPacket::unpack(&mut stream, -1) {
//!     Ok(packet) => info!(id = packet.id, "Received packet"),
//!     Err(ProtocolError::Io(e)) => error!(error = %e, "Stream failed"),
//!     Err(e) => error!(error = %e, "Malformed packet"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Codec errors
    pub const ERR_VARINT_TOO_LONG: &str = "VarInt is too big";
    pub const ERR_VARLONG_TOO_LONG: &str = "VarLong is too big";

    /// Compression errors
    pub const ERR_COMPRESSION_FAILED: &str = "Compression failed";
    pub const ERR_DECOMPRESSION_FAILED: &str = "Decompression failed";

    /// Pool errors
    pub const ERR_LOCK_POISONED: &str = "Synchronization primitive poisoned";
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}", constants::ERR_VARINT_TOO_LONG)]
    VarIntTooLong,

    #[error("{}", constants::ERR_VARLONG_TOO_LONG)]
    VarLongTooLong,

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("compressed packet error: size of {size} is below threshold of {threshold}")]
    BelowThreshold { size: i32, threshold: i32 },

    #[error("compressed packet error: size of {size} is larger than protocol maximum of {max}")]
    OversizedPacket { size: usize, max: usize },

    #[error("compressed packet error: data inflates past declared length of {declared}")]
    DataLengthMismatch { declared: usize },

    #[error("invalid length: {0}")]
    InvalidLength(i64),

    #[error("wrong packet id: expect {expected:#04X}, get {actual:#04X}")]
    WrongPacketId { expected: i32, actual: i32 },

    #[error("invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("unexpected value kind: expected {expected}, got {actual}")]
    UnexpectedKind {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}", constants::ERR_COMPRESSION_FAILED)]
    CompressionFailure,

    #[error("{}", constants::ERR_DECOMPRESSION_FAILED)]
    DecompressionFailure,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Whether the error came from the underlying stream rather than from the bytes on it
    pub fn is_io(&self) -> bool {
        matches!(self, ProtocolError::Io(_))
    }

    /// Whether the error is a violation of the compressed framing invariants
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            ProtocolError::BelowThreshold { .. }
                | ProtocolError::OversizedPacket { .. }
                | ProtocolError::DataLengthMismatch { .. }
                | ProtocolError::InvalidLength(_)
        )
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_packet_id_message() {
        let err = ProtocolError::WrongPacketId {
            expected: 0x00,
            actual: 0x1A,
        };
        assert_eq!(err.to_string(), "wrong packet id: expect 0x00, get 0x1A");
    }

    #[test]
    fn test_framing_classification() {
        assert!(ProtocolError::BelowThreshold {
            size: 10,
            threshold: 256
        }
        .is_framing());
        assert!(ProtocolError::InvalidLength(-1).is_framing());
        assert!(ProtocolError::DataLengthMismatch { declared: 300 }.is_framing());
        assert!(!ProtocolError::VarIntTooLong.is_framing());

        let io = ProtocolError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(io.is_io());
        assert!(!io.is_framing());
    }
}
