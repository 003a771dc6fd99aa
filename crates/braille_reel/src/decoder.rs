use std::io::Read;

use crate::{ContainerReader, Frame, Header, Result};

/// Reconstructs frames by accumulating the deltas of a container.
///
/// The reconstructed frame starts all-zero and is only ever changed by XOR-ing
/// the next delta into it.
pub struct Decoder<R> {
    reader: ContainerReader<R>,
    frame: Frame,
    failed: bool,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: ContainerReader<R>) -> Self {
        let frame = Frame::blank(reader.header().geometry);
        Self {
            reader,
            frame,
            failed: false,
        }
    }

    /// Reads the header from `reader` and prepares to decode.
    pub fn open(reader: R) -> Result<Self> {
        Ok(Self::new(ContainerReader::new(reader)?))
    }

    #[inline]
    pub fn header(&self) -> &Header {
        self.reader.header()
    }

    /// The most recently reconstructed frame.
    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of frames reconstructed so far.
    #[inline]
    pub fn frames_decoded(&self) -> u32 {
        self.reader.frames_read()
    }

    /// Decodes the next delta into the current frame.
    ///
    /// Returns `false` without touching the frame once the stream is exhausted.
    pub fn advance(&mut self) -> Result<bool> {
        match self.reader.next_delta()? {
            Some(delta) => {
                self.frame.apply_delta(delta)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Frame>;

    /// Yields owned copies of every reconstructed frame in order.
    ///
    /// The first error is the last item.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.advance() {
            Ok(true) => Some(Ok(self.frame.clone())),
            Ok(false) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
