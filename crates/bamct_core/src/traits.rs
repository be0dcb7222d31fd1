//! Ports between the header logic and its collaborators.
//!
//! The core never opens files or draws pixels itself: file access goes
//! through [`BlockSource`] and [`HeaderSource`], pixel loading through
//! [`RawImageLoader`], and the result of every load decision is handed
//! to a [`FrameHost`].

use crate::error::Result;
use crate::frames::FrameSelection;
use crate::header::HeaderDescriptor;
use crate::poller::WatchEvent;
use crate::types::{ByteOrder, PixelType};
use serde::Serialize;
use std::path::PathBuf;

/// Random-access byte reads over a file that may still be growing.
pub trait BlockSource {
    /// Reads into `buffer` starting at `offset`.
    ///
    /// Returns the number of bytes actually read, which may be less than
    /// `buffer.len()` at the end of the source.
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize>;

    /// Current size of the source in bytes.
    fn size(&self) -> Result<u64>;
}

/// Something that can produce a fresh header snapshot on demand.
pub trait HeaderSource {
    fn read_header(&mut self) -> Result<HeaderDescriptor>;
}

/// Fully resolved description of a raw read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawImageRequest {
    pub path: PathBuf,
    pub byte_offset: u64,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub pixel_type: PixelType,
    pub byte_order: ByteOrder,
}

impl RawImageRequest {
    pub fn total_bytes(&self) -> Option<u64> {
        u64::from(self.width)
            .checked_mul(u64::from(self.height))?
            .checked_mul(self.pixel_type.bytes_per_pixel())?
            .checked_mul(u64::from(self.frame_count))
    }
}

/// Raw, undecoded samples returned by a loader.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub request: RawImageRequest,
    pub data: Vec<u8>,
}

impl FrameBuffer {
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The host's raw pixel reader.
pub trait RawImageLoader {
    fn load_raw_image(&mut self, request: &RawImageRequest) -> Result<FrameBuffer>;
}

/// Immutable snapshot handed to the host for every load decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadRequest {
    pub descriptor: HeaderDescriptor,
    pub selection: FrameSelection,
    pub byte_offset: u64,
}

impl LoadRequest {
    pub fn raw_request(&self, path: impl Into<PathBuf>) -> RawImageRequest {
        RawImageRequest {
            path: path.into(),
            byte_offset: self.byte_offset,
            width: self.descriptor.width,
            height: self.descriptor.height,
            frame_count: self.selection.frame_count,
            pixel_type: self.descriptor.pixel_type,
            byte_order: self.descriptor.byte_order,
        }
    }
}

/// Receives load decisions and watch signals.
pub trait FrameHost {
    /// Called once per initial load and once per detected growth.
    fn on_frame_range_resolved(&mut self, request: &LoadRequest) -> Result<()>;

    fn on_watch_event(&mut self, _event: &WatchEvent) {}
}
