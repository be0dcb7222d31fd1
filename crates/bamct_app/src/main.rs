//! bamct - BAM-CT tomography file reader
//!
//! Reads the headers of `.dd` (data) and `.db` (image) files, loads a
//! frame range, and can keep showing the newest frame while an
//! acquisition is still writing.

mod host;
mod inspect;
mod session;
mod synth;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, bounded};
use std::path::PathBuf;
use tracing::Level;

const LONG_ABOUT: &str = "\
Reads BAM-CT image formats.
It can currently read the following formats:

  DD:   BAM-CT Data Format
  DB:   BAM-CT Image Format

Byte order and field layout come from the 12-character name stored at
the start of each file, not from the file name on disk.";

#[derive(Parser, Debug)]
#[command(name = "bamct")]
#[command(author, version, about, long_about = LONG_ABOUT)]
struct Args {
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the header of a file.
    Inspect {
        path: PathBuf,

        #[arg(long, default_value_t = false)]
        json: bool,

        /// Hex dump of the header region up to the pixel data.
        #[arg(long, default_value_t = false)]
        hexdump: bool,
    },

    /// Load a frame range, optionally watching the file for new frames.
    Open(session::OpenArgs),

    /// Write a synthetic file, optionally appending frames over time.
    Synth(synth::SynthArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Inspect {
            path,
            json,
            hexdump,
        } => inspect::run_inspect(&path, json, hexdump),
        Command::Open(options) => session::run_open(&options),
        Command::Synth(options) => synth::run_synth(&options),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Ctrl+C becomes a message on the returned channel. Installed only
/// right before a long-running loop so prompts keep the default behavior.
pub(crate) fn install_interrupt_handler() -> Result<Receiver<()>> {
    let (tx, rx) = bounded(1);

    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })
    .context("Failed to set Ctrl+C handler")?;

    Ok(rx)
}
