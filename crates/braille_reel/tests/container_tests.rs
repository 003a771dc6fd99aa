use braille_reel::*;
use image::{GrayImage, Luma};
use pretty_assertions::assert_eq;

fn frames_2x1() -> (Geometry, Vec<Frame>) {
    let g = Geometry::new(2, 1).unwrap();
    let frames = [[0x00, 0x00], [0xFF, 0x00], [0xFF, 0xFF]]
        .iter()
        .map(|cells| Frame::from_cells(g, cells.to_vec()).unwrap())
        .collect();
    (g, frames)
}

fn encode(geometry: Geometry, framerate: u32, frames: &[Frame]) -> Vec<u8> {
    let mut encoder = Encoder::new(geometry, framerate);
    for frame in frames {
        encoder.push(frame).unwrap();
    }
    let mut out = Vec::new();
    encoder.finish(&mut out).unwrap();
    out
}

#[test]
fn test_end_to_end_three_frames() {
    let (g, frames) = frames_2x1();
    let bytes = encode(g, 10, &frames);

    // deltas against the previous frame, the first against all-zero
    let mut reader = ContainerReader::new(bytes.as_slice()).unwrap();
    assert_eq!(
        *reader.header(),
        Header::new(10, g, 3).unwrap(),
        "header must describe the animation"
    );
    let mut deltas = Vec::new();
    while let Some(delta) = reader.next_delta().unwrap() {
        deltas.push(delta.cells().to_vec());
    }
    assert_eq!(deltas, vec![vec![0x00, 0x00], vec![0xFF, 0x00], vec![0x00, 0xFF]]);

    let decoded: Vec<Frame> = Decoder::open(bytes.as_slice())
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(decoded, frames);
}

#[test]
fn test_container_layout() {
    let (g, frames) = frames_2x1();
    let bytes = encode(g, 10, &frames);

    assert_eq!(
        bytes,
        vec![
            10, 0, 0, 0, // framerate
            2, 0, 0, 0, // width
            1, 0, 0, 0, // height
            3, 0, 0, 0, // frame count
            0x82, 0x00, 0x00, // frame 0
            0x82, 0xFF, 0x00, // frame 1
            0x82, 0x00, 0xFF, // frame 2
        ]
    );
}

#[test]
fn test_truncated_container_is_detected() {
    let g = Geometry::new(8, 4).unwrap();
    let frames: Vec<Frame> = (0..4u8)
        .map(|i| {
            let cells = (0..32u8).map(|c| c.wrapping_mul(i + 3) ^ i).collect();
            Frame::from_cells(g, cells).unwrap()
        })
        .collect();
    let bytes = encode(g, 24, &frames);

    for cut in Header::SIZE + 1..bytes.len() {
        let mut decoder = Decoder::open(&bytes[..cut]).unwrap();
        let mut result = Ok(true);
        for _ in 0..frames.len() {
            result = decoder.advance();
            if result.is_err() {
                break;
            }
        }
        let err = result.expect_err("truncated stream must not decode completely");
        assert!(err.is_corruption(), "cut at {cut}: {err}");
        assert!(
            matches!(err, ReelError::CorruptFrame { .. }),
            "cut at {cut}: {err:?}"
        );
    }
}

#[test]
fn test_header_only_file_is_corrupt_when_frames_promised() {
    let (g, frames) = frames_2x1();
    let bytes = encode(g, 10, &frames);
    let mut decoder = Decoder::open(&bytes[..Header::SIZE]).unwrap();
    match decoder.advance() {
        Err(ReelError::CorruptFrame { frame: 0, source }) => {
            assert!(matches!(
                *source,
                ReelError::Truncated {
                    produced: 0,
                    expected: 2
                }
            ));
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_png_sequence_to_container() {
    let dir = tempfile::tempdir().unwrap();
    let g = Geometry::new(4, 2).unwrap();

    // a vertical bar sweeping right, one pixel column per frame
    for i in 0..8u32 {
        let image = GrayImage::from_fn(8, 8, |x, _| Luma([if x == i { 255 } else { 0 }]));
        image.save(dir.path().join(format!("{:04}.png", i + 1))).unwrap();
    }

    let mut encoder = Encoder::new(g, 12);
    let mut originals = Vec::new();
    for frame in FrameSequence::new(dir.path(), g) {
        let frame = frame.unwrap();
        encoder.push(&frame).unwrap();
        originals.push(frame);
    }
    let mut out = Vec::new();
    let stats = encoder.finish(&mut out).unwrap();
    assert_eq!(stats.frames, 8);

    let decoded: Vec<Frame> = Decoder::open(out.as_slice())
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(decoded, originals);

    // column x lights the left or right dots of cell x / 2 in both rows
    for (i, frame) in decoded.iter().enumerate() {
        let column = if i % 2 == 0 { 0b0100_0111 } else { 0b1011_1000 };
        let cell = i / 2;
        for y in 0..2 {
            for x in 0..4 {
                let expected = if x == cell { column } else { 0 };
                assert_eq!(frame.cells()[y * 4 + x], expected, "frame {i} cell ({x},{y})");
            }
        }
    }
}
