#![no_main]

use braille_reel::{ContainerReader, Decoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Headers promising oversized frames are rejected before any allocation
    let Ok(reader) = ContainerReader::new(data) else {
        return;
    };
    let mut decoder = Decoder::new(reader);
    while let Ok(true) = decoder.advance() {}
    // A reader that reported an error stays finished
    assert!(matches!(decoder.advance(), Ok(false)));
});
