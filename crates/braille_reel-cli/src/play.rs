//! reel-play - Play a braille animation in the terminal
//!
//! Reads a container written by `reel-encode` and replays it at its recorded
//! frame rate. Ctrl-C, `q` or Esc stop playback early.

mod logging;
mod terminal;

use braille_reel::{ContainerReader, Outcome, Player, ReelError, SystemClock};
use clap::Parser;
use log::{info, LevelFilter};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use terminal::TerminalGuard;

const EXIT_OPEN_FAILED: u8 = 1;
const EXIT_CORRUPT: u8 = 2;
const EXIT_PLAYBACK_FAILED: u8 = 3;

#[derive(Parser)]
#[command(name = "reel-play")]
#[command(version)]
#[command(about = "Play a braille animation in the terminal", long_about = None)]
struct Cli {
    /// Container written by reel-encode
    #[arg(default_value = "data.bin")]
    input: PathBuf,
}

fn main() -> ExitCode {
    logging::init(LevelFilter::Warn);
    let cli = Cli::parse();

    // Nothing below touches the terminal until the container is known to open.
    let file = match File::open(&cli.input) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open frame data '{}': {}", cli.input.display(), e);
            return ExitCode::from(EXIT_OPEN_FAILED);
        }
    };
    let reader = match ContainerReader::new(BufReader::new(file)) {
        Ok(reader) => reader,
        Err(e) => return report(&cli, &e, EXIT_OPEN_FAILED),
    };
    let header = *reader.header();
    info!(
        "'{}': {}x{} cells, {} frames at {} fps ({:?})",
        cli.input.display(),
        header.geometry.width(),
        header.geometry.height(),
        header.frame_count,
        header.framerate,
        header.duration()
    );

    match play(reader) {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Interrupted) => {
            info!("playback interrupted");
            ExitCode::SUCCESS
        }
        Err(e) => report(&cli, &e, EXIT_PLAYBACK_FAILED),
    }
}

fn play<R: Read>(reader: ContainerReader<R>) -> braille_reel::Result<Outcome> {
    let screen_len = braille_reel::GlyphCanvas::new(reader.header().geometry)
        .as_bytes()
        .len();
    let mut out = BufWriter::with_capacity(screen_len, io::stdout().lock());

    let _guard = TerminalGuard::enter(&mut out)?;
    let mut player = Player::new(reader, SystemClock::start());
    player.run(&mut out, terminal::wait_for_interrupt)
}

fn report(cli: &Cli, e: &ReelError, otherwise: u8) -> ExitCode {
    eprintln!("Failed to play '{}': {}", cli.input.display(), e);
    let mut source = e.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    ExitCode::from(exit_status(e, otherwise))
}

/// Corrupt data has its own status whichever stage found it.
fn exit_status(e: &ReelError, otherwise: u8) -> u8 {
    if e.is_corruption() {
        EXIT_CORRUPT
    } else {
        otherwise
    }
}
