//! Turns a requested frame range into the frames actually loaded.
//!
//! A requested value of 0 means "auto". First and count both at 0 is
//! the growth-watch sentinel: show only the newest frame and keep
//! watching the file. No clamping against the frame total is done; an
//! out-of-range selection fails later when the pixel read comes up
//! short.

use crate::error::{CoreError, Result};
use crate::header::HeaderDescriptor;
use crate::traits::LoadRequest;
use serde::Serialize;

/// Frame range as typed by the user; 0 means "auto".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameRequest {
    pub first: u32,
    pub count: u32,
}

impl FrameRequest {
    pub const GROWTH_WATCH: Self = Self { first: 0, count: 0 };

    #[inline]
    pub const fn new(first: u32, count: u32) -> Self {
        Self { first, count }
    }

    /// Every frame, from the first one on.
    #[inline]
    pub const fn all(total_frames: u32) -> Self {
        Self {
            first: 1,
            count: total_frames,
        }
    }

    #[inline]
    pub const fn is_growth_watch(&self) -> bool {
        self.first == 0 && self.count == 0
    }
}

/// 1-based frame range to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameSelection {
    pub first_frame: u32,
    pub frame_count: u32,
}

impl FrameSelection {
    #[inline]
    pub const fn newest(total_frames: u32) -> Self {
        Self {
            first_frame: total_frames,
            frame_count: 1,
        }
    }

    /// Number of whole frames to skip past the pixel-data offset.
    #[inline]
    pub const fn byte_offset_multiplier(&self) -> u64 {
        self.first_frame.saturating_sub(1) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub selection: FrameSelection,
    /// Set when the growth-watch sentinel was requested.
    pub watch: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameRangeResolver;

impl FrameRangeResolver {
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    pub fn resolve(&self, total_frames: u32, request: FrameRequest) -> Result<Resolution> {
        let FrameRequest { first, count } = request;
        let total = i64::from(total_frames);

        let (first, count, watch) = if request.is_growth_watch() {
            (total, 1, true)
        } else if first > 0 && count == 0 {
            (i64::from(first), total - i64::from(first) + 1, false)
        } else if first == 0 {
            (total - i64::from(count) + 1, i64::from(count), false)
        } else {
            (i64::from(first), i64::from(count), false)
        };

        if first < 1 {
            return Err(CoreError::InvalidSelection(format!(
                "resolved first frame {first} for {total_frames} frames (request {}/{})",
                request.first, request.count
            )));
        }
        if count < 0 {
            return Err(CoreError::InvalidSelection(format!(
                "resolved frame count {count} for {total_frames} frames (request {}/{})",
                request.first, request.count
            )));
        }

        Ok(Resolution {
            selection: FrameSelection {
                first_frame: first as u32,
                frame_count: count as u32,
            },
            watch,
        })
    }

    /// Resolves `request` against `descriptor` and computes the absolute
    /// offset of the first frame to load.
    pub fn plan(
        &self,
        descriptor: &HeaderDescriptor,
        request: FrameRequest,
    ) -> Result<(LoadRequest, bool)> {
        let resolution = self.resolve(descriptor.frame_count, request)?;
        let load = load_request(descriptor, resolution.selection)?;
        Ok((load, resolution.watch))
    }
}

/// Absolute offset is `pixel_data_offset + frame_bytes * (first - 1)`.
pub fn load_request(
    descriptor: &HeaderDescriptor,
    selection: FrameSelection,
) -> Result<LoadRequest> {
    if selection.first_frame == 0 {
        return Err(CoreError::InvalidSelection(
            "frames are numbered from 1".into(),
        ));
    }

    let byte_offset = descriptor.offset_after_frames(selection.byte_offset_multiplier())?;
    Ok(LoadRequest {
        descriptor: descriptor.clone(),
        selection,
        byte_offset,
    })
}
