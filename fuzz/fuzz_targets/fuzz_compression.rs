#![no_main]

use libfuzzer_sys::fuzz_target;
use mc_protocol::utils::compression::{compress, decompress};

fuzz_target!(|data: &[u8]| {
    // Round-trip must hold for any input
    if let Ok(compressed) = compress(data, 6) {
        let decompressed = decompress(&compressed).expect("own output must inflate");
        assert_eq!(decompressed, data);
    }

    // Raw decompression must respect the size cap on malformed data
    let _ = decompress(data);
});
