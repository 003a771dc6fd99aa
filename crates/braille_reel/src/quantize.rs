//! Ordered-dither quantizer: grayscale pixels to braille cell masks.
//!
//! Each glyph cell samples a 2x4 block of pixels. A pixel turns its dot on
//! when its contrast-stretched intensity exceeds the threshold taken from an
//! 8x8 Bayer-style matrix at its absolute position, so flat regions produce a
//! stable pattern from frame to frame (which keeps the deltas small).

use image::GrayImage;

use crate::{Frame, Geometry, ReelError, Result};

/// 8x8 ordered-dither matrix, indexed `[(y % 8) * 8 + (x % 8)]`.
pub const DITHER_TABLE: [u8; 64] = [
    0, 48, 12, 60, 3, 51, 15, 63, //
    32, 16, 44, 28, 35, 19, 47, 31, //
    8, 56, 4, 52, 11, 59, 7, 55, //
    40, 24, 36, 20, 43, 27, 39, 23, //
    2, 50, 14, 62, 1, 49, 13, 61, //
    34, 18, 46, 30, 33, 17, 45, 29, //
    10, 58, 6, 54, 9, 57, 5, 53, //
    42, 26, 38, 22, 41, 25, 37, 21, //
];

/// `(dx, dy)` of the pixel feeding bit `j` of a cell mask.
///
/// This is braille dot order (dots 1-2-3 down the left column, 4-5-6 down the
/// right, then 7 and 8 on the bottom row), not raster order.
pub const DOT_OFFSETS: [(u32, u32); 8] = [
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (0, 3),
    (1, 3),
];

#[inline]
fn threshold(x: u32, y: u32) -> f32 {
    let it = DITHER_TABLE[((y % 8) * 8 + (x % 8)) as usize];
    (it as f32 + 0.5) / 64.0
}

#[inline]
fn stretch(sample: u8) -> f32 {
    // pushes the extremes to pure black/white so flat areas don't dither
    let value = sample as f32 / 255.0;
    value * 1.04 - 0.02
}

/// Quantizes a single-channel 8-bit image into one frame.
///
/// The image must be exactly `(2 * width, 4 * height)` pixels for the given
/// geometry. Any other size returns [`ReelError::SizeMismatch`], which the
/// frame sequence reader treats as the end of the input.
pub fn quantize(
    pixels: &[u8],
    pixel_width: u32,
    pixel_height: u32,
    geometry: Geometry,
) -> Result<Frame> {
    if pixel_width != geometry.pixel_width() || pixel_height != geometry.pixel_height() {
        return Err(ReelError::SizeMismatch {
            expected: geometry.pixel_width() as usize * geometry.pixel_height() as usize,
            actual: pixel_width as usize * pixel_height as usize,
        });
    }
    let stride = pixel_width as usize;
    let expected = stride * pixel_height as usize;
    if pixels.len() != expected {
        return Err(ReelError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    let mut frame = Frame::blank(geometry);
    let cells = frame.cells_mut();
    let width = geometry.width();

    for y in 0..geometry.height() {
        for x in 0..width {
            let mut mask = 0u8;
            for (j, &(dx, dy)) in DOT_OFFSETS.iter().enumerate() {
                let px = x * 2 + dx;
                let py = y * 4 + dy;
                let sample = pixels[py as usize * stride + px as usize];
                if stretch(sample) > threshold(px, py) {
                    mask |= 1 << j;
                }
            }
            cells[(y * width + x) as usize] = mask;
        }
    }

    Ok(frame)
}

/// Quantizes a decoded grayscale image.
#[inline]
pub fn quantize_image(image: &GrayImage, geometry: Geometry) -> Result<Frame> {
    quantize(image.as_raw(), image.width(), image.height(), geometry)
}
