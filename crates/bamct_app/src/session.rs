//! `open`: initial load followed, on request, by live watching.

use crate::host::ConsoleHost;
use anyhow::{Context, Result};
use bamct_core::{
    FrameHost, FrameRangeResolver, FrameRequest, HeaderDescriptor, HeaderSource, LiveUpdatePoller,
    PollerConfig, RawImageLoader,
};
use bamct_io::{FileHeaderSource, RawFileLoader};
use clap::Args;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
    pub path: PathBuf,

    /// First frame to load (1-based, 0 = auto).
    #[arg(long)]
    pub first: Option<u32>,

    /// Number of frames to load (0 = auto).
    #[arg(long)]
    pub count: Option<u32>,

    /// Show only the newest frame and keep watching for new ones (same as --first 0 --count 0).
    #[arg(short, long, default_value_t = false)]
    pub watch: bool,

    /// Never ask for the frame range.
    #[arg(long, default_value_t = false)]
    pub no_prompt: bool,

    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// One JSON object per load instead of a summary line.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl OpenArgs {
    fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(self.interval_ms),
        }
    }
}

pub fn run_open(args: &OpenArgs) -> Result<()> {
    let mut source = FileHeaderSource::open(&args.path)
        .with_context(|| format!("Failed to open {}", args.path.display()))?;
    let descriptor = source
        .read_header()
        .with_context(|| format!("Failed to read header of {}", args.path.display()))?;
    tracing::info!(%descriptor, "opened {}", args.path.display());

    let request = match requested_range(args) {
        Some(request) => request,
        None if descriptor.frame_count > 1 && !args.no_prompt => prompt_range(&descriptor)?,
        None => FrameRequest::all(descriptor.frame_count),
    };

    let host = ConsoleHost::new(&args.path, RawFileLoader::new(), args.json);
    let Some(host) = initial_load(&descriptor, request, host)? else {
        return Ok(());
    };

    let mut poller = LiveUpdatePoller::new(
        source,
        host,
        descriptor.frame_count,
        args.poller_config(),
    );

    let interrupts = crate::install_interrupt_handler()?;
    let handle = poller.stop_handle();
    thread::spawn(move || {
        if interrupts.recv().is_ok() {
            handle.stop();
        }
    });

    eprintln!(
        "Watching {} every {} ms, Ctrl+C to stop",
        args.path.display(),
        args.interval_ms
    );
    poller.run();
    eprintln!("Stopped after {} loads", poller.host().loaded().len());

    Ok(())
}

/// Performs the initial load. Returns the host back when the request
/// asked for live watching.
pub fn initial_load<L: RawImageLoader>(
    descriptor: &HeaderDescriptor,
    request: FrameRequest,
    mut host: ConsoleHost<L>,
) -> Result<Option<ConsoleHost<L>>> {
    let (load, watch) = FrameRangeResolver::new()
        .plan(descriptor, request)
        .context("Invalid frame range")?;

    host.on_frame_range_resolved(&load)
        .context("Failed to load frames")?;

    Ok(watch.then_some(host))
}

fn requested_range(args: &OpenArgs) -> Option<FrameRequest> {
    if args.watch {
        return Some(FrameRequest::GROWTH_WATCH);
    }
    match (args.first, args.count) {
        (None, None) => None,
        (first, count) => Some(FrameRequest::new(
            first.unwrap_or(0),
            count.unwrap_or(0),
        )),
    }
}

fn prompt_range(descriptor: &HeaderDescriptor) -> Result<FrameRequest> {
    let theme = ColorfulTheme::default();

    let first: u32 = Input::with_theme(&theme)
        .with_prompt("First frame (0 = auto)")
        .default(1)
        .interact_text()
        .context("Failed to read first frame")?;

    let count: u32 = Input::with_theme(&theme)
        .with_prompt("Number of frames (0 = auto, 0/0 = watch newest)")
        .default(descriptor.frame_count)
        .interact_text()
        .context("Failed to read number of frames")?;

    Ok(FrameRequest::new(first, count))
}
