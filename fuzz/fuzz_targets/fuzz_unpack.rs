#![no_main]

use libfuzzer_sys::fuzz_target;
use mc_protocol::RawPacket;

fuzz_target!(|data: &[u8]| {
    // Fuzz frame parsing in both layouts - test for panics, unbounded allocation, infinite loops
    let _ = RawPacket::unpack(&mut &data[..], -1);
    let _ = RawPacket::unpack(&mut &data[..], 0);
    let _ = RawPacket::unpack(&mut &data[..], 256);
});
