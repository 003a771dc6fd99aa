//! Frame-by-frame animation encoder.
//!
//! The header stores the frame count, which is only known once the input is
//! exhausted, so compressed frames are collected in memory and written out
//! behind the header by [`Encoder::finish`].

use std::io::Write;

use crate::container::{ContainerWriter, Header};
use crate::{rle, Frame, Geometry, ReelError, Result};

/// Size summary of a finished encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// Number of frames written.
    pub frames: u32,
    /// Size of the frames before compression.
    pub raw_bytes: u64,
    /// Size of the container, header included.
    pub compressed_bytes: u64,
}

impl EncodeStats {
    /// `compressed / raw`, 0.0 for an empty animation.
    pub fn ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }
}

/// Diffs each pushed frame against its predecessor and RLE-compresses the delta.
///
/// # Example
/// ```ignore
/// use braille_reel::{Encoder, Frame, Geometry};
///
/// let geometry = Geometry::new(2, 1)?;
/// let mut encoder = Encoder::new(geometry, 10);
/// encoder.push(&Frame::from_cells(geometry, vec![0xFF, 0x00])?)?;
/// let mut out = Vec::new();
/// encoder.finish(&mut out)?;
/// ```
pub struct Encoder {
    geometry: Geometry,
    framerate: u32,
    previous: Frame,
    body: Vec<u8>,
    frames: u32,
}

impl Encoder {
    pub fn new(geometry: Geometry, framerate: u32) -> Self {
        Self {
            geometry,
            framerate,
            previous: Frame::blank(geometry),
            body: Vec::new(),
            frames: 0,
        }
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Frames pushed so far.
    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.frames
    }

    /// Appends a frame. Returns the compressed size of its delta.
    pub fn push(&mut self, frame: &Frame) -> Result<usize> {
        let expected = self.geometry.frame_len();
        if frame.len() != expected {
            return Err(ReelError::SizeMismatch {
                expected,
                actual: frame.len(),
            });
        }
        let delta = Frame::delta(&self.previous, frame)?;
        let before = self.body.len();
        rle::encode(delta.cells(), &mut self.body);
        self.previous.clone_from(frame);
        self.frames += 1;

        let size = self.body.len() - before;
        debug!("frame {}: delta compressed to {size} bytes", self.frames);
        Ok(size)
    }

    /// Writes the header and every compressed frame to `writer`.
    pub fn finish<W: Write>(self, writer: W) -> Result<EncodeStats> {
        let header = Header::new(self.framerate, self.geometry, self.frames)?;
        let mut out = ContainerWriter::new(writer, header)?;
        out.write_encoded(&self.body, self.frames)?;
        out.finish()?;

        Ok(EncodeStats {
            frames: self.frames,
            raw_bytes: self.frames as u64 * self.geometry.frame_len() as u64,
            compressed_bytes: (Header::SIZE + self.body.len()) as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContainerReader;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_stores_deltas() {
        let g = Geometry::new(2, 1).unwrap();
        let frames = [[0x00, 0x00], [0xFF, 0x00], [0xFF, 0xFF]];
        let mut encoder = Encoder::new(g, 10);
        for cells in frames {
            encoder.push(&Frame::from_cells(g, cells.to_vec()).unwrap()).unwrap();
        }

        let mut out = Vec::new();
        let stats = encoder.finish(&mut out).unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.raw_bytes, 6);
        assert_eq!(stats.compressed_bytes, out.len() as u64);

        let mut reader = ContainerReader::new(out.as_slice()).unwrap();
        assert_eq!(reader.header().framerate, 10);
        let mut deltas = Vec::new();
        while let Some(delta) = reader.next_delta().unwrap() {
            deltas.push(delta.cells().to_vec());
        }
        assert_eq!(deltas, vec![vec![0x00, 0x00], vec![0xFF, 0x00], vec![0x00, 0xFF]]);
    }

    #[test]
    fn test_encode_rejects_wrong_size() {
        let mut encoder = Encoder::new(Geometry::new(2, 2).unwrap(), 30);
        let frame = Frame::blank(Geometry::new(3, 1).unwrap());
        assert!(encoder.push(&frame).is_err());
        assert_eq!(encoder.frame_count(), 0);
    }

    #[test]
    fn test_empty_animation() {
        let encoder = Encoder::new(Geometry::new(4, 4).unwrap(), 30);
        let mut out = Vec::new();
        let stats = encoder.finish(&mut out).unwrap();
        assert_eq!(out.len(), Header::SIZE);
        assert_eq!(stats.ratio(), 0.0);
    }

    #[test]
    fn test_static_animation_compresses() {
        let g = Geometry::new(80, 30).unwrap();
        let frame = Frame::from_cells(g, vec![0x55; g.frame_len()]).unwrap();
        let mut encoder = Encoder::new(g, 30);
        for _ in 0..10 {
            encoder.push(&frame).unwrap();
        }
        let stats = encoder.finish(std::io::sink()).unwrap();
        assert!(stats.ratio() < 0.05, "ratio {}", stats.ratio());
    }
}
