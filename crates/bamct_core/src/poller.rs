//! Live-growth watching.
//!
//! While an acquisition is still writing frames, the poller re-reads the
//! header on every tick, and when the frame count grows it asks the host
//! to load the newest frame. One poller owns one header source; the
//! loop runs on the caller's thread and never overlaps two iterations.

use crate::frames::{FrameSelection, load_request};
use crate::traits::{FrameHost, HeaderSource};
use crossbeam_channel::{Receiver, Sender, bounded, select, tick};
use std::cmp::Ordering;
use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Watching,
    Stopped,
}

/// Reportable signals raised while watching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The header could not be read this tick; watching continues.
    ReadFailed { error: String },
    /// The frame count went down. No reload is attempted.
    FrameCountAnomaly { previous: u32, observed: u32 },
    Reloaded { frame: u32 },
    ReloadFailed { frame: u32, error: String },
}

impl std::fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { error } => write!(f, "header re-read failed: {error}"),
            Self::FrameCountAnomaly { previous, observed } => {
                write!(f, "frame count dropped from {previous} to {observed}")
            }
            Self::Reloaded { frame } => write!(f, "reloaded newest frame {frame}"),
            Self::ReloadFailed { frame, error } => {
                write!(f, "reload of frame {frame} failed: {error}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Unchanged,
    Grew { previous: u32, current: u32 },
    ReadFailed,
    Anomaly { previous: u32, observed: u32 },
    ReloadFailed,
    /// The poller was not watching, nothing was read.
    Inactive,
}

/// Cloneable handle that asks a running poller to stop.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        // A full slot means a stop is already pending.
        let _ = self.tx.try_send(());
    }
}

pub struct LiveUpdatePoller<S, H> {
    source: S,
    host: H,
    config: PollerConfig,
    state: PollerState,
    known_frame_count: u32,
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
}

impl<S: HeaderSource, H: FrameHost> LiveUpdatePoller<S, H> {
    pub fn new(source: S, host: H, known_frame_count: u32, config: PollerConfig) -> Self {
        let (stop_tx, stop_rx) = bounded(1);
        Self {
            source,
            host,
            config,
            state: PollerState::Idle,
            known_frame_count,
            stop_tx,
            stop_rx,
        }
    }

    #[inline]
    pub fn state(&self) -> PollerState {
        self.state
    }

    #[inline]
    pub fn known_frame_count(&self) -> u32 {
        self.known_frame_count
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: self.stop_tx.clone(),
        }
    }

    /// Idle -> Watching. A stopped poller stays stopped.
    pub fn start(&mut self) {
        if self.state == PollerState::Idle {
            tracing::debug!(frames = self.known_frame_count, "watching for new frames");
            self.state = PollerState::Watching;
        }
    }

    pub fn stop(&mut self) {
        if self.state != PollerState::Stopped {
            tracing::debug!(frames = self.known_frame_count, "stopped watching");
        }
        self.state = PollerState::Stopped;
    }

    /// One iteration: re-read the header and reload on growth.
    pub fn poll_once(&mut self) -> PollOutcome {
        if self.state != PollerState::Watching {
            return PollOutcome::Inactive;
        }

        let descriptor = match self.source.read_header() {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(error = %e, "header re-read failed, will retry");
                self.host.on_watch_event(&WatchEvent::ReadFailed {
                    error: e.to_string(),
                });
                return PollOutcome::ReadFailed;
            }
        };

        let previous = self.known_frame_count;
        let current = descriptor.frame_count;

        match current.cmp(&previous) {
            Ordering::Equal => PollOutcome::Unchanged,
            Ordering::Less => {
                tracing::warn!(previous, observed = current, "frame count decreased");
                self.host.on_watch_event(&WatchEvent::FrameCountAnomaly {
                    previous,
                    observed: current,
                });
                // Growth is measured from the new count from here on.
                self.known_frame_count = current;
                PollOutcome::Anomaly {
                    previous,
                    observed: current,
                }
            }
            Ordering::Greater => {
                let reload = load_request(&descriptor, FrameSelection::newest(current))
                    .and_then(|request| self.host.on_frame_range_resolved(&request));

                match reload {
                    Ok(()) => {
                        tracing::info!(previous, current, "new frames, showing the newest");
                        self.known_frame_count = current;
                        self.host
                            .on_watch_event(&WatchEvent::Reloaded { frame: current });
                        PollOutcome::Grew { previous, current }
                    }
                    Err(e) => {
                        tracing::warn!(frame = current, error = %e, "reload failed, will retry");
                        self.host.on_watch_event(&WatchEvent::ReloadFailed {
                            frame: current,
                            error: e.to_string(),
                        });
                        PollOutcome::ReloadFailed
                    }
                }
            }
        }
    }

    /// Polls every `config.interval` until stopped.
    pub fn run(&mut self) -> PollerState {
        let ticks = tick(self.config.interval);
        self.run_with_ticks(&ticks)
    }

    /// Polls once per message on `ticks` until a stop is requested or the
    /// tick source disconnects. Waiting for the next tick is interrupted
    /// by a stop request.
    pub fn run_with_ticks(&mut self, ticks: &Receiver<Instant>) -> PollerState {
        self.start();
        let stop_rx = self.stop_rx.clone();

        while self.state == PollerState::Watching {
            if stop_rx.try_recv().is_ok() {
                self.stop();
                break;
            }

            select! {
                recv(stop_rx) -> _ => self.stop(),
                recv(ticks) -> msg => match msg {
                    Ok(_) => {
                        self.poll_once();
                    }
                    Err(_) => self.stop(),
                },
            }
        }

        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, Result};
    use crate::header::HeaderDescriptor;
    use crate::traits::LoadRequest;
    use crate::types::{ByteOrder, FormatVariant, PixelType};
    use crossbeam_channel::{never, unbounded};
    use std::collections::VecDeque;
    use std::thread;

    fn descriptor(frames: u32) -> HeaderDescriptor {
        HeaderDescriptor {
            embedded_name: "scan0001d00l".into(),
            byte_order: ByteOrder::LittleEndian,
            variant: FormatVariant::DataFormat,
            width: 64,
            height: 32,
            frame_count: frames,
            pixel_type: PixelType::Unsigned16,
            pixel_data_offset: 512,
        }
    }

    /// Replays a fixed list of frame counts; `None` is a failed read.
    struct ScriptedSource {
        script: VecDeque<Option<u32>>,
    }

    impl ScriptedSource {
        fn new(script: &[Option<u32>]) -> Self {
            Self {
                script: script.iter().copied().collect(),
            }
        }
    }

    impl HeaderSource for ScriptedSource {
        fn read_header(&mut self) -> Result<HeaderDescriptor> {
            match self.script.pop_front() {
                Some(Some(frames)) => Ok(descriptor(frames)),
                Some(None) => Err(CoreError::TruncatedHeader {
                    expected: 52,
                    actual: 0,
                }),
                None => Err(CoreError::Io(std::io::Error::other("script exhausted"))),
            }
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        loads: Vec<LoadRequest>,
        events: Vec<WatchEvent>,
        failures_left: usize,
        stop_after_load: Option<StopHandle>,
    }

    impl FrameHost for RecordingHost {
        fn on_frame_range_resolved(&mut self, request: &LoadRequest) -> Result<()> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(CoreError::ShortRead {
                    offset: request.byte_offset,
                    expected: 4096,
                    actual: 0,
                });
            }
            self.loads.push(request.clone());
            if let Some(handle) = &self.stop_after_load {
                handle.stop();
            }
            Ok(())
        }

        fn on_watch_event(&mut self, event: &WatchEvent) {
            self.events.push(event.clone());
        }
    }

    fn poller(script: &[Option<u32>]) -> LiveUpdatePoller<ScriptedSource, RecordingHost> {
        LiveUpdatePoller::new(
            ScriptedSource::new(script),
            RecordingHost::default(),
            10,
            PollerConfig::default(),
        )
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(PollerConfig::default().interval, Duration::from_millis(500));
    }

    #[test]
    fn test_idle_until_started() {
        let mut p = poller(&[Some(12)]);
        assert_eq!(p.state(), PollerState::Idle);
        assert_eq!(p.poll_once(), PollOutcome::Inactive);
        assert!(p.host().loads.is_empty());
    }

    #[test]
    fn test_growth_triggers_single_reload() {
        let mut p = poller(&[Some(10), Some(10), Some(13)]);
        p.start();

        assert_eq!(p.poll_once(), PollOutcome::Unchanged);
        assert_eq!(p.poll_once(), PollOutcome::Unchanged);
        assert_eq!(
            p.poll_once(),
            PollOutcome::Grew {
                previous: 10,
                current: 13
            }
        );

        let host = p.host();
        assert_eq!(host.loads.len(), 1);
        let load = &host.loads[0];
        assert_eq!(load.selection.first_frame, 13);
        assert_eq!(load.selection.frame_count, 1);
        assert_eq!(load.byte_offset, 512 + 64 * 2 * 32 * 12);
        assert_eq!(host.events, vec![WatchEvent::Reloaded { frame: 13 }]);
        assert_eq!(p.known_frame_count(), 13);
    }

    #[test]
    fn test_decrease_is_reported_not_reloaded() {
        let mut p = poller(&[Some(7)]);
        p.start();

        assert_eq!(
            p.poll_once(),
            PollOutcome::Anomaly {
                previous: 10,
                observed: 7
            }
        );
        assert!(p.host().loads.is_empty());
        assert_eq!(
            p.host().events,
            vec![WatchEvent::FrameCountAnomaly {
                previous: 10,
                observed: 7
            }]
        );
        assert_eq!(p.state(), PollerState::Watching);
    }

    #[test]
    fn test_read_failure_keeps_watching() {
        let mut p = poller(&[None, Some(11)]);
        p.start();

        assert_eq!(p.poll_once(), PollOutcome::ReadFailed);
        assert_eq!(p.state(), PollerState::Watching);
        assert_eq!(p.known_frame_count(), 10);
        assert!(matches!(
            p.host().events[0],
            WatchEvent::ReadFailed { .. }
        ));

        assert!(matches!(p.poll_once(), PollOutcome::Grew { current: 11, .. }));
    }

    #[test]
    fn test_failed_reload_is_retried() {
        let mut p = poller(&[Some(11), Some(11)]);
        p.host_mut().failures_left = 1;
        p.start();

        assert_eq!(p.poll_once(), PollOutcome::ReloadFailed);
        assert_eq!(p.known_frame_count(), 10);
        assert!(matches!(p.poll_once(), PollOutcome::Grew { current: 11, .. }));
        assert_eq!(p.host().loads.len(), 1);
    }

    #[test]
    fn test_run_until_ticks_disconnect() {
        let mut p = poller(&[Some(10), Some(10), Some(13)]);
        let (tx, rx) = unbounded();
        for _ in 0..3 {
            tx.send(Instant::now()).unwrap();
        }
        drop(tx);

        assert_eq!(p.run_with_ticks(&rx), PollerState::Stopped);
        assert_eq!(p.host().loads.len(), 1);
        assert_eq!(p.host().loads[0].selection.first_frame, 13);
    }

    #[test]
    fn test_stop_before_run() {
        let mut p = poller(&[Some(20)]);
        p.stop_handle().stop();
        let (tx, rx) = unbounded();
        tx.send(Instant::now()).unwrap();

        assert_eq!(p.run_with_ticks(&rx), PollerState::Stopped);
        assert!(p.host().loads.is_empty());
    }

    #[test]
    fn test_stop_is_checked_between_iterations() {
        let mut p = poller(&[Some(11), Some(12), Some(13)]);
        let handle = p.stop_handle();
        p.host_mut().stop_after_load = Some(handle);

        let (tx, rx) = unbounded();
        for _ in 0..3 {
            tx.send(Instant::now()).unwrap();
        }

        assert_eq!(p.run_with_ticks(&rx), PollerState::Stopped);
        assert_eq!(p.host().loads.len(), 1);
        assert_eq!(p.known_frame_count(), 11);
    }

    #[test]
    fn test_stop_interrupts_wait() {
        let mut p = poller(&[]);
        let handle = p.stop_handle();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.stop();
        });

        let ticks = never();
        assert_eq!(p.run_with_ticks(&ticks), PollerState::Stopped);
        stopper.join().unwrap();
    }

    #[test]
    fn test_stopped_poller_does_not_restart() {
        let mut p = poller(&[Some(11)]);
        p.stop();
        p.start();
        assert_eq!(p.state(), PollerState::Stopped);
        assert_eq!(p.poll_once(), PollOutcome::Inactive);
    }

    #[test]
    fn test_watch_event_display() {
        let e = WatchEvent::FrameCountAnomaly {
            previous: 10,
            observed: 7,
        };
        assert_eq!(e.to_string(), "frame count dropped from 10 to 7");
    }
}
