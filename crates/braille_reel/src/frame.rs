//! Glyph geometry and bitmask frames.

use crate::{ReelError, Result, CELL_LIMIT, FRAME_CELL_LIMIT};

/// Size of the animation in glyph cells.
///
/// Every cell covers a 2x4 block of source pixels, so the source images are
/// `2 * width` by `4 * height` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: u32,
    height: u32,
}

impl Geometry {
    /// Creates a geometry, rejecting empty or oversized grids.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > CELL_LIMIT || height > CELL_LIMIT {
            return Err(ReelError::InvalidDimensions { width, height });
        }
        if width as usize * height as usize > FRAME_CELL_LIMIT {
            return Err(ReelError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in glyph cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in glyph cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in one bitmask frame.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Expected source image width in pixels.
    #[inline]
    pub fn pixel_width(&self) -> u32 {
        self.width * 2
    }

    /// Expected source image height in pixels.
    #[inline]
    pub fn pixel_height(&self) -> u32 {
        self.height * 4
    }
}

/// One bitmask per glyph cell, row-major.
///
/// Bit `j` of a cell is braille dot `j + 1`. The length is fixed when the
/// frame is created and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: Vec<u8>,
}

impl Frame {
    /// An all-zero frame, the implicit predecessor of the first frame.
    pub fn blank(geometry: Geometry) -> Self {
        Self {
            cells: vec![0; geometry.frame_len()],
        }
    }

    /// Wraps existing cell masks, checking the length against `geometry`.
    pub fn from_cells(geometry: Geometry, cells: Vec<u8>) -> Result<Self> {
        let expected = geometry.frame_len();
        if cells.len() != expected {
            return Err(ReelError::SizeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { cells })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// `next XOR previous`, byte by byte.
    pub fn delta(previous: &Frame, next: &Frame) -> Result<Frame> {
        check_len(previous.len(), next.len())?;
        let cells = previous
            .cells
            .iter()
            .zip(next.cells.iter())
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(Frame { cells })
    }

    /// XORs `delta` into this frame. Applying the same delta twice restores the original.
    pub fn apply_delta(&mut self, delta: &Frame) -> Result<()> {
        check_len(self.len(), delta.len())?;
        for (cell, d) in self.cells.iter_mut().zip(delta.cells.iter()) {
            *cell ^= d;
        }
        Ok(())
    }

    pub fn into_cells(self) -> Vec<u8> {
        self.cells
    }
}

#[inline]
fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ReelError::SizeMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(cells: &[u8]) -> Frame {
        let geometry = Geometry::new(cells.len() as u32, 1).unwrap();
        Frame::from_cells(geometry, cells.to_vec()).unwrap()
    }

    #[test]
    fn test_geometry_rejects_zero() {
        assert!(Geometry::new(0, 4).is_err());
        assert!(Geometry::new(4, 0).is_err());
        assert!(Geometry::new(CELL_LIMIT + 1, 1).is_err());
    }

    #[test]
    fn test_geometry_rejects_huge_frames() {
        assert!(Geometry::new(CELL_LIMIT, 256).is_ok());
        assert!(Geometry::new(CELL_LIMIT, 257).is_err());
        assert!(Geometry::new(CELL_LIMIT, CELL_LIMIT).is_err());
        assert!(Geometry::new(1024, 1024).is_ok());
    }

    #[test]
    fn test_geometry_pixel_size() {
        let g = Geometry::new(80, 30).unwrap();
        assert_eq!(g.frame_len(), 2400);
        assert_eq!(g.pixel_width(), 160);
        assert_eq!(g.pixel_height(), 120);
    }

    #[test]
    fn test_from_cells_checks_length() {
        let g = Geometry::new(2, 2).unwrap();
        assert!(Frame::from_cells(g, vec![0; 3]).is_err());
        assert!(Frame::from_cells(g, vec![0; 4]).is_ok());
    }

    #[test]
    fn test_delta_self_inverse() {
        let a = frame(&[0x00, 0x5A, 0xFF, 0x81, 0x3C]);
        let b = frame(&[0xFF, 0x5A, 0x0F, 0x18, 0x00]);

        let d = Frame::delta(&a, &b).unwrap();
        let mut restored = a.clone();
        restored.apply_delta(&d).unwrap();
        assert_eq!(restored, b);

        restored.apply_delta(&d).unwrap();
        assert_eq!(restored, a);
    }

    #[test]
    fn test_first_delta_is_frame() {
        let b = frame(&[0xFF, 0x00, 0x12]);
        let blank = Frame::blank(Geometry::new(3, 1).unwrap());
        assert_eq!(Frame::delta(&blank, &b).unwrap(), b);
    }

    #[test]
    fn test_delta_length_mismatch() {
        let a = frame(&[1, 2, 3]);
        let b = frame(&[1, 2]);
        assert!(Frame::delta(&a, &b).is_err());
        let mut a = a;
        assert!(a.apply_delta(&b).is_err());
    }
}
