//! # braille_reel
//!
//! Monochrome "pixel-art" animations for the terminal, drawn with Unicode
//! braille glyphs (U+2800..U+28FF).
//!
//! ## Features
//!
//! - **Quantizer**: ordered 8x8 dithering of grayscale frames into one byte per
//!   glyph cell, one bit per braille dot
//! - **Codec**: XOR delta frames compressed with a byte-oriented run-length scheme
//! - **Container**: a 16-byte header followed by the compressed frames
//! - **Player**: a wall-clock scheduler that decodes forward and renders only the
//!   latest frame when it falls behind
//!
//! ## Quick Start
//!
//! ### Encoding a numbered PNG sequence
//!
//! ```ignore
//! use braille_reel::{Encoder, FrameSequence, Geometry};
//!
//! let geometry = Geometry::new(80, 30)?;
//! let mut encoder = Encoder::new(geometry, 30);
//! for frame in FrameSequence::new("frames", geometry) {
//!     encoder.push(&frame?)?;
//! }
//! let stats = encoder.finish(std::fs::File::create("data.bin")?)?;
//! println!("{} frames, {} bytes", stats.frames, stats.compressed_bytes);
//! ```
//!
//! ### Playing a container
//!
//! ```ignore
//! use braille_reel::{ContainerReader, Player, SystemClock};
//!
//! let reader = ContainerReader::new(std::io::BufReader::new(std::fs::File::open("data.bin")?))?;
//! let mut player = Player::new(reader, SystemClock::start());
//! player.run(&mut std::io::stdout(), |pause| {
//!     std::thread::sleep(pause);
//!     Ok(false)
//! })?;
//! ```

#[macro_use]
extern crate log;

use thiserror::Error;

pub mod container;
pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod player;
pub mod quantize;
pub mod render;
pub mod rle;
pub mod sequence;

pub use container::{ContainerReader, ContainerWriter, Header};
pub use decoder::Decoder;
pub use encoder::{EncodeStats, Encoder};
pub use frame::{Frame, Geometry};
pub use player::{Clock, Outcome, Player, Scheduler, SystemClock, Tick};
pub use quantize::{quantize, quantize_image};
pub use render::GlyphCanvas;
pub use sequence::FrameSequence;

/// Errors that can occur while encoding, decoding or playing an animation.
#[derive(Debug, Error)]
pub enum ReelError {
    /// Invalid glyph geometry (width or height is zero or too large)
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Buffer size doesn't match the size implied by the geometry
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Container header could not be accepted
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Compressed stream ended before a frame was complete
    #[error("truncated stream: decoded {produced} of {expected} bytes")]
    Truncated { produced: usize, expected: usize },

    /// A record would write past the end of the frame
    #[error("record overruns frame: {attempted} bytes for a {expected}-byte frame")]
    Overrun { attempted: usize, expected: usize },

    /// Decoding of a specific frame failed
    #[error("corrupt frame {frame}")]
    CorruptFrame {
        frame: u32,
        #[source]
        source: Box<ReelError>,
    },

    /// Number of frames written differs from the header
    #[error("frame count mismatch: header says {expected}, wrote {actual}")]
    FrameCountMismatch { expected: u32, actual: u32 },

    /// Source image could not be decoded
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReelError {
    /// Returns true if this error (or the error it wraps) reports a damaged stream.
    pub fn is_corruption(&self) -> bool {
        match self {
            ReelError::Truncated { .. } | ReelError::Overrun { .. } => true,
            ReelError::CorruptFrame { .. } | ReelError::InvalidHeader(_) => true,
            _ => false,
        }
    }
}

/// Result type for braille_reel operations.
pub type Result<T> = core::result::Result<T, ReelError>;

/// Largest width or height in glyph cells.
pub const CELL_LIMIT: u32 = 4096;

/// Largest number of cells in one frame.
///
/// A header is only 16 bytes but sizes every buffer of the reader, decoder
/// and canvas, so this bounds what an untrusted file can make us allocate.
pub const FRAME_CELL_LIMIT: usize = 1 << 20;
