#![no_main]

use braille_reel::rle;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u16, &[u8])| {
    let (len, data) = input;
    // The decoder should never panic, and never claim more input than it was given
    if let Ok((out, consumed)) = rle::decode_slice(data, len as usize) {
        assert_eq!(out.len(), len as usize);
        assert!(consumed <= data.len());
    }
});
