//! Login state packets.
//!
//! Encryption and plugin payloads are carried as opaque byte arrays; this
//! crate performs no cryptography.

use crate::core::types::{chat_text, ByteArray, Chat, Identifier, VarInt};
use uuid::Uuid;

// --- Clientbound ---

packet! {
    /// Ends the login with a chat component explaining why.
    LoginDisconnect = 0x00 {
        reason: Chat,
    }
}

packet! {
    /// Starts protocol encryption.
    EncryptionRequest = 0x01 {
        /// Empty on vanilla servers
        server_id: String,
        /// DER-encoded RSA public key
        public_key: ByteArray,
        verify_token: ByteArray,
    }
}

packet! {
    /// Completes the login and moves the connection to the play state.
    LoginSuccess = 0x02 {
        uuid: Uuid,
        username: String,
    }
}

packet! {
    /// Enables compression for every frame after this one.
    ///
    /// A negative threshold disables it again.
    SetCompression = 0x03 {
        threshold: VarInt,
    }
}

packet! {
    /// Custom login step owned by a plugin channel.
    LoginPluginRequest = 0x04 {
        message_id: VarInt,
        channel: Identifier,
        data: ByteArray,
    }
}

// --- Serverbound ---

packet! {
    /// First login packet from the client.
    LoginStart = 0x00 {
        name: String,
    }
}

packet! {
    EncryptionResponse = 0x01 {
        shared_secret: ByteArray,
        verify_token: ByteArray,
    }
}

packet! {
    /// Answer to a [`LoginPluginRequest`] with the same `message_id`.
    LoginPluginResponse = 0x02 {
        message_id: VarInt,
        successful: bool,
        data: ByteArray,
    }
}

impl LoginDisconnect {
    /// Disconnect with a plain text reason.
    pub fn with_text(reason: &str) -> Self {
        Self {
            reason: chat_text(reason),
        }
    }
}

impl SetCompression {
    pub fn threshold(&self) -> i32 {
        self.threshold.0
    }
}
