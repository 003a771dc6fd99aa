//! reel-encode - Convert a numbered PNG sequence into a braille animation
//!
//! Frames are read from `<frames>/0001.png`, `0002.png`, ... until the first
//! missing or differently sized image.

mod logging;

use braille_reel::{Encoder, FrameSequence, Geometry};
use clap::Parser;
use log::{info, LevelFilter};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reel-encode")]
#[command(version)]
#[command(about = "Convert a numbered PNG sequence into a braille animation", long_about = None)]
struct Cli {
    /// Directory holding 0001.png, 0002.png, ...
    #[arg(short, long, default_value = "frames")]
    frames: PathBuf,

    /// Output container file
    #[arg(short, long, default_value = "data.bin")]
    output: PathBuf,

    /// Width in glyph cells (images are twice as wide in pixels)
    #[arg(short = 'W', long, value_parser = clap::value_parser!(u32).range(1..=4096))]
    width: u32,

    /// Height in glyph cells (images are four times as tall in pixels)
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..=4096))]
    height: u32,

    /// Playback rate in frames per second
    #[arg(short = 'r', long, default_value = "30", value_parser = clap::value_parser!(u32).range(1..=1000))]
    framerate: u32,

    /// Number of the first image
    #[arg(short, long, default_value = "1")]
    start: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(LevelFilter::Info);
    let cli = Cli::parse();

    let geometry = Geometry::new(cli.width, cli.height)?;
    info!(
        "expecting {}x{} pixel frames for {}x{} cells",
        geometry.pixel_width(),
        geometry.pixel_height(),
        geometry.width(),
        geometry.height()
    );

    let frames = FrameSequence::new(&cli.frames, geometry).starting_at(cli.start);
    let first = frames.path_for(cli.start);
    let mut encoder = Encoder::new(geometry, cli.framerate);
    for frame in frames {
        encoder.push(&frame?)?;
    }
    if encoder.frame_count() == 0 {
        return Err(format!(
            "no frames found: '{}' is missing or not {}x{} pixels",
            first.display(),
            geometry.pixel_width(),
            geometry.pixel_height()
        )
        .into());
    }

    info!("compressing and saving {} frames", encoder.frame_count());
    let file = File::create(&cli.output)
        .map_err(|e| format!("Failed to create '{}': {}", cli.output.display(), e))?;
    let stats = encoder.finish(BufWriter::new(file))?;

    eprintln!(
        "Written {} frames to '{}': {} -> {} bytes ({:.1}%)",
        stats.frames,
        cli.output.display(),
        stats.raw_bytes,
        stats.compressed_bytes,
        stats.ratio() * 100.0
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rejects_zero_framerate() {
        let args = ["reel-encode", "-W", "80", "-H", "30", "--framerate", "0"];
        assert!(Cli::try_parse_from(args).is_err());
        let cli = Cli::try_parse_from(&args[..5]).unwrap();
        assert_eq!(cli.framerate, 30);
        assert_eq!(cli.output, PathBuf::from("data.bin"));
    }
}
