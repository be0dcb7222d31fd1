use bamct_core::{FrameHost, LoadRequest, RawImageLoader, Result, WatchEvent};
use bamct_io::RawFileLoader;
use humansize::{BINARY, format_size};
use std::path::PathBuf;

/// Loads every resolved range through [`RawFileLoader`] and reports it on
/// stdout. Display is left to whatever consumes that output.
pub struct ConsoleHost<L = RawFileLoader> {
    path: PathBuf,
    loader: L,
    json: bool,
    loaded: Vec<LoadRequest>,
}

impl<L: RawImageLoader> ConsoleHost<L> {
    pub fn new(path: impl Into<PathBuf>, loader: L, json: bool) -> Self {
        Self {
            path: path.into(),
            loader,
            json,
            loaded: Vec::new(),
        }
    }

    pub fn loaded(&self) -> &[LoadRequest] {
        &self.loaded
    }
}

impl<L: RawImageLoader> FrameHost for ConsoleHost<L> {
    fn on_frame_range_resolved(&mut self, request: &LoadRequest) -> Result<()> {
        let buffer = self
            .loader
            .load_raw_image(&request.raw_request(&self.path))?;

        if self.json {
            match serde_json::to_string(request) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to serialize load request"),
            }
        } else {
            let selection = request.selection;
            let last = (selection.first_frame + selection.frame_count).saturating_sub(1);
            println!(
                "Loaded frames {}..={} of {} ({} at offset {})",
                selection.first_frame,
                last,
                request.descriptor.frame_count,
                format_size(buffer.len() as u64, BINARY),
                request.byte_offset
            );
        }

        self.loaded.push(request.clone());
        Ok(())
    }

    fn on_watch_event(&mut self, event: &WatchEvent) {
        match event {
            WatchEvent::Reloaded { .. } => {}
            other => eprintln!("[Watch] {other}"),
        }
    }
}
