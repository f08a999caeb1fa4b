#![no_main]

use libfuzzer_sys::fuzz_target;
use mc_protocol::protocol::handshake::Handshake;
use mc_protocol::{Packet, RawPacket};

fuzz_target!(|data: &[u8]| {
    // Fuzz typed decoding of an arbitrary payload
    let raw = RawPacket::new(Handshake::ID, data.to_vec());
    if let Ok(handshake) = Handshake::from_raw(&raw) {
        // If decoding succeeds, the canonical re-encoding must decode to the same record
        let encoded = handshake.to_raw().expect("decoded handshake must encode");
        assert_eq!(Handshake::from_raw(&encoded).expect("re-decode"), handshake);
    }
});
