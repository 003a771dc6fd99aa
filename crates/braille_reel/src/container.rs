//! Container file layout.
//!
//! ```text
//! Header (16 bytes, little-endian):
//!   Framerate:   u32   frames per second
//!   Width:       u32   glyph cells
//!   Height:      u32   glyph cells
//!   Frame count: u32
//!
//! Frame data (variable):
//!   frame_count delta frames, each a run of RLE records that decodes to
//!   exactly width * height bytes. No length prefixes, no delimiters.
//! ```
//!
//! A frame's extent is only known by decoding it, so the stream must be read
//! strictly in order.

use std::io::{self, Read, Write};
use std::time::Duration;

use crate::{rle, Frame, Geometry, ReelError, Result};

/// Fixed-size record at the start of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Playback rate in frames per second.
    pub framerate: u32,
    /// Frame size in glyph cells.
    pub geometry: Geometry,
    /// Number of delta frames following the header.
    pub frame_count: u32,
}

impl Header {
    /// Size of header in bytes.
    pub const SIZE: usize = 16;

    pub fn new(framerate: u32, geometry: Geometry, frame_count: u32) -> Result<Self> {
        if framerate == 0 {
            return Err(ReelError::InvalidHeader("framerate must be positive".into()));
        }
        Ok(Self {
            framerate,
            geometry,
            frame_count,
        })
    }

    /// Wall-clock duration of one frame.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.framerate
    }

    /// Playback length of the whole animation.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.frame_count as u64 * 1000 / self.framerate as u64)
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.framerate.to_le_bytes())?;
        w.write_all(&self.geometry.width().to_le_bytes())?;
        w.write_all(&self.geometry.height().to_le_bytes())?;
        w.write_all(&self.frame_count.to_le_bytes())?;
        Ok(())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        r.read_exact(&mut buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                ReelError::InvalidHeader(format!("file shorter than {} bytes", Self::SIZE))
            } else {
                ReelError::Io(e)
            }
        })?;

        let field = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
        let framerate = field(0);
        let width = field(4);
        let height = field(8);
        let frame_count = field(12);

        let geometry = Geometry::new(width, height)
            .map_err(|e| ReelError::InvalidHeader(e.to_string()))?;
        let header = Self::new(framerate, geometry, frame_count)?;
        debug!(
            "header: {}x{} cells, {} frames at {} fps",
            width, height, frame_count, framerate
        );
        Ok(header)
    }
}

/// Writes a header followed by RLE-compressed delta frames.
pub struct ContainerWriter<W> {
    writer: W,
    header: Header,
    written: u32,
    scratch: Vec<u8>,
}

impl<W: Write> ContainerWriter<W> {
    /// Writes `header` immediately; the frames must follow in playback order.
    pub fn new(mut writer: W, header: Header) -> Result<Self> {
        header.write_to(&mut writer)?;
        Ok(Self {
            writer,
            header,
            written: 0,
            scratch: Vec::with_capacity(header.geometry.frame_len()),
        })
    }

    /// Compresses and appends one delta frame. Returns the compressed size.
    pub fn write_delta(&mut self, delta: &Frame) -> Result<usize> {
        let expected = self.header.geometry.frame_len();
        if delta.len() != expected {
            return Err(ReelError::SizeMismatch {
                expected,
                actual: delta.len(),
            });
        }
        self.scratch.clear();
        rle::encode(delta.cells(), &mut self.scratch);
        self.writer.write_all(&self.scratch)?;
        self.written += 1;
        Ok(self.scratch.len())
    }

    /// Appends already-compressed frame records verbatim.
    pub(crate) fn write_encoded(&mut self, records: &[u8], frames: u32) -> Result<()> {
        self.writer.write_all(records)?;
        self.written += frames;
        Ok(())
    }

    /// Checks the frame count against the header and flushes.
    pub fn finish(mut self) -> Result<W> {
        if self.written != self.header.frame_count {
            return Err(ReelError::FrameCountMismatch {
                expected: self.header.frame_count,
                actual: self.written,
            });
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reads a header, then decodes delta frames one at a time.
pub struct ContainerReader<R> {
    reader: R,
    header: Header,
    delta: Frame,
    read: u32,
    failed: bool,
}

impl<R: Read> ContainerReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let header = Header::read_from(&mut reader)?;
        Ok(Self {
            reader,
            header,
            delta: Frame::blank(header.geometry),
            read: 0,
            failed: false,
        })
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of delta frames decoded so far.
    #[inline]
    pub fn frames_read(&self) -> u32 {
        self.read
    }

    /// Decodes the next delta frame, or `None` once `frame_count` frames were read.
    ///
    /// The returned frame borrows an internal buffer that is reused for every call.
    /// After an error the record boundaries are lost, so every later call
    /// returns `None`.
    pub fn next_delta(&mut self) -> Result<Option<&Frame>> {
        if self.failed || self.read >= self.header.frame_count {
            return Ok(None);
        }
        let frame = self.read;
        if let Err(e) = rle::decode(&mut self.reader, self.delta.cells_mut()) {
            self.failed = true;
            debug!("stream stopped at frame {frame}: {e}");
            return Err(if e.is_corruption() {
                ReelError::CorruptFrame {
                    frame,
                    source: Box::new(e),
                }
            } else {
                e
            });
        }
        self.read += 1;
        trace!("decoded delta frame {frame}");
        Ok(Some(&self.delta))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
