//! Frame to braille text.
//!
//! Braille patterns live at U+2800 + mask, so every cell encodes in UTF-8 as
//! `E2 (A0 | mask >> 6) (80 | mask & 3F)`. The lead byte never changes, which
//! lets the canvas lay the whole screen out once and afterwards patch two
//! bytes per cell.

use crate::{Frame, Geometry, ReelError, Result};

/// Bytes of one encoded braille glyph.
const GLYPH_LEN: usize = 3;

/// UTF-8 of U+2800, the empty braille pattern.
const EMPTY_GLYPH: [u8; GLYPH_LEN] = [0xE2, 0xA0, 0x80];

/// Row terminator. The carriage return keeps rows aligned in raw terminal mode.
pub const ROW_END: &[u8] = b"\r\n";

/// Moves the cursor back to the top-left corner after the last row.
pub const CURSOR_HOME: &[u8] = b"\x1b[1;1H";

/// Pre-laid-out screen text for one geometry.
#[derive(Debug, Clone)]
pub struct GlyphCanvas {
    geometry: Geometry,
    text: Vec<u8>,
}

impl GlyphCanvas {
    pub fn new(geometry: Geometry) -> Self {
        let width = geometry.width() as usize;
        let height = geometry.height() as usize;
        let mut text =
            Vec::with_capacity((width * GLYPH_LEN + ROW_END.len()) * height + CURSOR_HOME.len());
        for _ in 0..height {
            for _ in 0..width {
                text.extend_from_slice(&EMPTY_GLYPH);
            }
            text.extend_from_slice(ROW_END);
        }
        text.extend_from_slice(CURSOR_HOME);
        Self { geometry, text }
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    fn row_stride(&self) -> usize {
        self.geometry.width() as usize * GLYPH_LEN + ROW_END.len()
    }

    /// Rewrites every glyph from the masks in `frame`.
    pub fn update(&mut self, frame: &Frame) -> Result<()> {
        let expected = self.geometry.frame_len();
        if frame.len() != expected {
            return Err(ReelError::SizeMismatch {
                expected,
                actual: frame.len(),
            });
        }

        let width = self.geometry.width() as usize;
        let stride = self.row_stride();
        for (y, row) in frame.cells().chunks_exact(width).enumerate() {
            let line = &mut self.text[y * stride..y * stride + width * GLYPH_LEN];
            for (glyph, &mask) in line.chunks_exact_mut(GLYPH_LEN).zip(row) {
                glyph[1] = 0xA0 | (mask >> 6);
                glyph[2] = 0x80 | (mask & 0x3F);
            }
        }
        Ok(())
    }

    /// The full screen text, cursor reset included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    /// The screen text as a string slice.
    pub fn as_str(&self) -> &str {
        // only ever holds complete braille glyphs and ASCII
        std::str::from_utf8(&self.text).unwrap_or_default()
    }
}
