//! Real-time playback.
//!
//! Every tick recomputes the frame that should be on screen from the absolute
//! time since playback started, decodes forward to it and renders only the
//! result. A slow terminal therefore drops frames instead of drifting, and the
//! work per tick tracks the wall-clock lag rather than the number of frames.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use crate::{ContainerReader, Decoder, GlyphCanvas, Header, Result};

/// Source of elapsed playback time.
pub trait Clock {
    /// Time since playback started.
    fn elapsed(&self) -> Duration;
}

/// Monotonic wall clock started at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    #[inline]
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Maps elapsed time to frame indices and tracks what has been decoded.
#[derive(Debug, Clone)]
pub struct Scheduler {
    framerate: u32,
    frame_count: u32,
    last_rendered: Option<u32>,
}

impl Scheduler {
    pub fn new(header: &Header) -> Self {
        Self {
            framerate: header.framerate,
            frame_count: header.frame_count,
            last_rendered: None,
        }
    }

    /// `floor(elapsed_ms * framerate / 1000)`.
    #[inline]
    pub fn target_frame(&self, elapsed: Duration) -> u64 {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        ms.saturating_mul(self.framerate as u64) / 1000
    }

    /// True once `target` is past the last frame.
    #[inline]
    pub fn is_finished(&self, target: u64) -> bool {
        target >= self.frame_count as u64
    }

    /// True while frames up to `target` still need decoding.
    #[inline]
    pub fn is_behind(&self, target: u64) -> bool {
        match self.last_rendered {
            None => true,
            Some(last) => target > last as u64,
        }
    }

    /// Index of the newest decoded frame, `None` before the first.
    #[inline]
    pub fn last_rendered(&self) -> Option<u32> {
        self.last_rendered
    }

    fn advance(&mut self) {
        let next = self.last_rendered.map_or(0, |last| last + 1);
        debug_assert!(next < self.frame_count);
        self.last_rendered = Some(next);
    }

    /// How long to sleep between ticks: a tenth of a frame.
    ///
    /// Short enough not to lag a whole frame behind, long enough not to spin.
    #[inline]
    pub fn pause(&self) -> Duration {
        Duration::from_micros(100_000 / self.framerate as u64)
    }
}

/// Result of one scheduling tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing was due.
    Idle,
    /// `decoded` deltas were applied and frame `frame` was written out.
    Rendered { frame: u32, decoded: u32 },
    /// The schedule has passed the last frame.
    Finished,
}

/// How a call to [`Player::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
}

/// Drives a [`Decoder`] and a [`GlyphCanvas`] from a [`Clock`].
pub struct Player<R, C> {
    decoder: Decoder<R>,
    canvas: GlyphCanvas,
    scheduler: Scheduler,
    clock: C,
}

impl<R: Read, C: Clock> Player<R, C> {
    /// Playback time starts when `clock` was started, not when this is called.
    pub fn new(reader: ContainerReader<R>, clock: C) -> Self {
        let header = *reader.header();
        Self {
            decoder: Decoder::new(reader),
            canvas: GlyphCanvas::new(header.geometry),
            scheduler: Scheduler::new(&header),
            clock,
        }
    }

    #[inline]
    pub fn header(&self) -> &Header {
        self.decoder.header()
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[inline]
    pub fn canvas(&self) -> &GlyphCanvas {
        &self.canvas
    }

    /// Decodes up to the frame due now and writes it to `out` if anything changed.
    pub fn tick<W: Write>(&mut self, out: &mut W) -> Result<Tick> {
        let target = self.scheduler.target_frame(self.clock.elapsed());
        if self.scheduler.is_finished(target) {
            self.drain()?;
            return Ok(Tick::Finished);
        }

        let mut decoded = 0;
        while self.scheduler.is_behind(target) {
            if !self.decoder.advance()? {
                return Ok(Tick::Finished);
            }
            self.scheduler.advance();
            decoded += 1;
        }
        if decoded == 0 {
            return Ok(Tick::Idle);
        }
        if decoded > 1 {
            trace!("behind schedule, skipped {} frames", decoded - 1);
        }

        self.canvas.update(self.decoder.frame())?;
        out.write_all(self.canvas.as_bytes())?;
        out.flush()?;

        Ok(Tick::Rendered {
            frame: target as u32,
            decoded,
        })
    }

    // Frames whose time slot passed inside the final tick are still decoded,
    // so a damaged tail is reported and the counter ends on the last frame.
    fn drain(&mut self) -> Result<()> {
        while self.decoder.advance()? {
            self.scheduler.advance();
        }
        Ok(())
    }

    /// Ticks until the animation ends or `wait` reports an interruption.
    ///
    /// `wait` is called after every tick with the pause to sleep for and
    /// returns `true` to stop playback early.
    pub fn run<W, F>(&mut self, out: &mut W, mut wait: F) -> Result<Outcome>
    where
        W: Write,
        F: FnMut(Duration) -> io::Result<bool>,
    {
        let pause = self.scheduler.pause();
        debug!(
            "playing {} frames at {} fps, tick pause {:?}",
            self.header().frame_count,
            self.header().framerate,
            pause
        );
        loop {
            if self.tick(out)? == Tick::Finished {
                return Ok(Outcome::Completed);
            }
            if wait(pause)? {
                debug!(
                    "interrupted after frame {:?}",
                    self.scheduler.last_rendered()
                );
                return Ok(Outcome::Interrupted);
            }
        }
    }
}
