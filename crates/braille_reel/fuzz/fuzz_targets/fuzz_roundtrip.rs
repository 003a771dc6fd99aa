#![no_main]

use arbitrary::Arbitrary;
use braille_reel::{rle, Decoder, Encoder, Frame, Geometry};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    cells: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let width = (input.width as u32).clamp(1, 64);
    let height = (input.height as u32).clamp(1, 16);
    let Ok(geometry) = Geometry::new(width, height) else {
        return;
    };
    let len = geometry.frame_len();
    if input.cells.len() < len {
        return;
    }

    // Raw RLE round trip over the whole buffer
    let encoded = rle::encode_to_vec(&input.cells);
    let (decoded, consumed) = rle::decode_slice(&encoded, input.cells.len()).unwrap();
    assert_eq!(decoded, input.cells);
    assert_eq!(consumed, encoded.len());

    // Container round trip over as many whole frames as the input holds
    let frames: Vec<Frame> = input
        .cells
        .chunks_exact(len)
        .map(|c| Frame::from_cells(geometry, c.to_vec()).unwrap())
        .collect();
    let mut encoder = Encoder::new(geometry, 30);
    for frame in &frames {
        encoder.push(frame).unwrap();
    }
    let mut bytes = Vec::new();
    encoder.finish(&mut bytes).unwrap();

    let decoder = Decoder::open(bytes.as_slice()).unwrap();
    let replayed: Vec<Frame> = decoder.map(|f| f.unwrap()).collect();
    assert_eq!(replayed, frames);
});
