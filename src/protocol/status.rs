//! Status state packets (server list ping).

use crate::error::Result;

packet! {
    /// Asks the server for its status. Serverbound.
    Request = 0x00 {}
}

packet! {
    /// Server status as a JSON document. Clientbound.
    Response = 0x00 {
        json_response: String,
    }
}

packet! {
    /// Latency probe. Serverbound.
    Ping = 0x01 {
        payload: i64,
    }
}

packet! {
    /// Echo of a [`Ping`] payload. Clientbound.
    Pong = 0x01 {
        payload: i64,
    }
}

impl Response {
    pub fn from_json(status: &serde_json::Value) -> Result<Self> {
        Ok(Self {
            json_response: serde_json::to_string(status)?,
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.json_response)?)
    }
}

impl From<Ping> for Pong {
    fn from(ping: Ping) -> Self {
        Self {
            payload: ping.payload,
        }
    }
}
