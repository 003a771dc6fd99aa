use braille_reel::{rle, ContainerReader, Decoder, Encoder, Frame, Geometry};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

const WIDTH: u32 = 80;
const HEIGHT: u32 = 30;

/// A circle of lit cells drifting across an empty screen.
fn moving_blob(geometry: Geometry, step: u32) -> Frame {
    let (w, h) = (geometry.width() as i64, geometry.height() as i64);
    let cx = (step as i64 * 2) % w;
    let cy = h / 2;
    let mut cells = Vec::with_capacity(geometry.frame_len());
    for y in 0..h {
        for x in 0..w {
            let d = (x - cx).pow(2) + ((y - cy) * 2).pow(2);
            cells.push(if d < 64 { 0xFF } else if d < 81 { 0x5A } else { 0x00 });
        }
    }
    Frame::from_cells(geometry, cells).expect("geometry matches")
}

fn noise(len: usize) -> Vec<u8> {
    let mut seed = 0x2545_F491u32;
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed as u8
        })
        .collect()
}

fn bench_rle(c: &mut Criterion) {
    let geometry = Geometry::new(WIDTH, HEIGHT).unwrap();
    let sparse = Frame::delta(&moving_blob(geometry, 0), &moving_blob(geometry, 1))
        .unwrap()
        .into_cells();
    let dense = noise(geometry.frame_len());

    let mut group = c.benchmark_group("rle");
    for (name, data) in [("sparse_delta", &sparse), ("noise", &dense)] {
        group.bench_with_input(BenchmarkId::new("encode", name), data, |b, data| {
            b.iter(|| rle::encode_to_vec(black_box(data)))
        });

        let encoded = rle::encode_to_vec(data);
        group.bench_with_input(BenchmarkId::new("decode", name), &encoded, |b, encoded| {
            b.iter(|| {
                let result = rle::decode_slice(black_box(encoded), data.len());
                assert!(result.is_ok());
                result
            })
        });
    }
    group.finish();
}

fn bench_decode_animation(c: &mut Criterion) {
    let geometry = Geometry::new(WIDTH, HEIGHT).unwrap();
    let mut encoder = Encoder::new(geometry, 30);
    for step in 0..120 {
        encoder.push(&moving_blob(geometry, step)).unwrap();
    }
    let mut bytes = Vec::new();
    encoder.finish(&mut bytes).unwrap();

    c.bench_function("decode_120_frames_80x30", |b| {
        b.iter(|| {
            let reader = ContainerReader::new(black_box(bytes.as_slice())).unwrap();
            let mut decoder = Decoder::new(reader);
            while decoder.advance().unwrap() {}
            decoder.frames_decoded()
        })
    });
}

criterion_group!(benches, bench_rle, bench_decode_animation);
criterion_main!(benches);
