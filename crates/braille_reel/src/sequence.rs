//! Numbered image sequences (`0001.png`, `0002.png`, ...).

use std::io;
use std::path::{Path, PathBuf};

use image::ImageError;

use crate::{quantize_image, Frame, Geometry, ReelError, Result};

/// Iterates the frames of a numbered image sequence in a directory.
///
/// The sequence ends at the first file that is missing, cannot be decoded or
/// does not have the expected `(2 * width, 4 * height)` size. None of these
/// are errors; only I/O failures on an existing file are reported.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    dir: PathBuf,
    geometry: Geometry,
    next: u32,
    done: bool,
}

impl FrameSequence {
    /// Starts at `0001.png` in `dir`.
    pub fn new(dir: impl Into<PathBuf>, geometry: Geometry) -> Self {
        Self {
            dir: dir.into(),
            geometry,
            next: 1,
            done: false,
        }
    }

    /// Starts at a different index instead of 1.
    pub fn starting_at(mut self, index: u32) -> Self {
        self.next = index;
        self
    }

    /// File name used for frame `index`.
    pub fn path_for(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{index:04}.png"))
    }

    /// Index of the file the next call to `next` will read.
    #[inline]
    pub fn next_index(&self) -> u32 {
        self.next
    }

    fn end(&mut self, path: &Path, reason: &dyn std::fmt::Display) {
        info!("end of sequence at {}: {}", path.display(), reason);
        self.done = true;
    }
}

impl Iterator for FrameSequence {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let path = self.path_for(self.next);

        let image = match image::open(&path) {
            Ok(image) => image,
            Err(ImageError::IoError(e)) if e.kind() == io::ErrorKind::NotFound => {
                self.end(&path, &"not found");
                return None;
            }
            Err(ImageError::IoError(e)) => {
                self.done = true;
                return Some(Err(ReelError::Io(e)));
            }
            Err(e) => {
                warn!("cannot decode {}: {e}", path.display());
                self.end(&path, &"undecodable");
                return None;
            }
        };

        match quantize_image(&image.to_luma8(), self.geometry) {
            Ok(frame) => {
                info!("converting frame {}", self.next);
                self.next += 1;
                Some(Ok(frame))
            }
            Err(ReelError::SizeMismatch { .. }) => {
                let reason = format!(
                    "{}x{} pixels, expected {}x{}",
                    image.width(),
                    image.height(),
                    self.geometry.pixel_width(),
                    self.geometry.pixel_height()
                );
                self.end(&path, &reason);
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
