//! Handshaking state packets.

use crate::core::types::VarInt;

/// `next_state` value that switches the connection to the status state
pub const NEXT_STATE_STATUS: i32 = 1;

/// `next_state` value that switches the connection to the login state
pub const NEXT_STATE_LOGIN: i32 = 2;

packet! {
    /// Switches the server into the state named by `next_state`.
    ///
    /// Serverbound.
    Handshake = 0x00 {
        protocol_version: VarInt,
        server_address: String,
        server_port: u16,
        next_state: VarInt,
    }
}

packet! {
    /// Server list ping from pre-1.7 clients. Modern servers still answer it.
    ///
    /// Serverbound. `payload` is always 1.
    LegacyServerListPing = 0xFE {
        payload: u8,
    }
}

impl Handshake {
    /// Handshake for the protocol version this crate targets.
    pub fn new(server_address: impl Into<String>, server_port: u16, next_state: i32) -> Self {
        Self {
            protocol_version: VarInt(crate::config::PROTOCOL_VERSION),
            server_address: server_address.into(),
            server_port,
            next_state: VarInt(next_state),
        }
    }
}
