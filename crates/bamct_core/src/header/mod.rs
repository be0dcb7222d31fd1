//! BAM-CT header layout.
//!
//! Every file starts with a 12-byte embedded name followed by ten 32-bit
//! fields. Two characters of the embedded name select the byte order and
//! the field order; the OS file name plays no part in it.

mod parser;
mod writer;

pub use parser::{HeaderParser, byte_order_of, variant_of};
pub use writer::{HeaderFields, HeaderWriter};

use crate::error::{CoreError, Result};
use crate::types::{ByteOrder, FormatVariant, PixelType};
use serde::Serialize;

pub const EMBEDDED_NAME_LEN: usize = 12;

/// 0-based index of the variant marker (9th character).
pub const VARIANT_MARKER_INDEX: usize = 8;

/// 0-based index of the byte-order marker (12th character).
pub const BYTE_ORDER_MARKER_INDEX: usize = 11;

pub const DATA_FORMAT_MARKER: u8 = b'd';

pub const BIG_ENDIAN_MARKER: u8 = b'x';

pub const HEADER_FIELD_COUNT: usize = 10;

pub const HEADER_LEN: usize = EMBEDDED_NAME_LEN + HEADER_FIELD_COUNT * 4;

pub const MIN_PIXEL_DATA_OFFSET: u64 = 512;

/// Field indices (0-based) of the values we care about. Every other
/// field is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldLayout {
    pub width: usize,
    pub height: usize,
    pub frame_count: usize,
    pub pixel_type: usize,
}

const DATA_FORMAT_LAYOUT: FieldLayout = FieldLayout {
    width: 1,
    height: 4,
    frame_count: 2,
    pixel_type: 9,
};

const IMAGE_FORMAT_LAYOUT: FieldLayout = FieldLayout {
    width: 0,
    height: 1,
    frame_count: 4,
    pixel_type: 9,
};

#[inline]
pub(crate) const fn layout_of(variant: FormatVariant) -> FieldLayout {
    match variant {
        FormatVariant::DataFormat => DATA_FORMAT_LAYOUT,
        FormatVariant::ImageFormat => IMAGE_FORMAT_LAYOUT,
    }
}

/// Absolute byte position of the frame-count field for `variant`.
#[must_use]
pub const fn frame_count_field_offset(variant: FormatVariant) -> u64 {
    (EMBEDDED_NAME_LEN + layout_of(variant).frame_count * 4) as u64
}

/// Smallest multiple of `width * bytes_per_pixel` that is at least 512.
///
/// A zero row unit can never reach 512 and is reported as a header read
/// failure instead.
pub fn pixel_data_offset(width: u32, pixel_type: PixelType) -> Result<u64> {
    let bytes_per_pixel = pixel_type.bytes_per_pixel();
    let unit = u64::from(width) * bytes_per_pixel;
    if unit == 0 {
        return Err(CoreError::EmptyRowUnit {
            width,
            bytes_per_pixel,
        });
    }

    Ok(MIN_PIXEL_DATA_OFFSET.div_ceil(unit) * unit)
}

/// Immutable snapshot of one header read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderDescriptor {
    pub embedded_name: String,
    pub byte_order: ByteOrder,
    pub variant: FormatVariant,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub pixel_type: PixelType,
    pub pixel_data_offset: u64,
}

impl HeaderDescriptor {
    #[inline]
    pub const fn bytes_per_pixel(&self) -> u64 {
        self.pixel_type.bytes_per_pixel()
    }

    #[inline]
    pub const fn row_bytes(&self) -> u64 {
        self.width as u64 * self.bytes_per_pixel()
    }

    pub fn frame_bytes(&self) -> Result<u64> {
        self.row_bytes()
            .checked_mul(u64::from(self.height))
            .ok_or_else(|| {
                CoreError::OffsetOverflow(format!(
                    "{} x {} frame of {}",
                    self.width, self.height, self.pixel_type
                ))
            })
    }

    /// Absolute byte offset after skipping `frames` whole frames.
    pub fn offset_after_frames(&self, frames: u64) -> Result<u64> {
        self.frame_bytes()?
            .checked_mul(frames)
            .and_then(|skip| skip.checked_add(self.pixel_data_offset))
            .ok_or_else(|| CoreError::OffsetOverflow(format!("{frames} frames skipped")))
    }

    #[must_use]
    pub const fn has_unrecognized_pixel_type(&self) -> bool {
        !self.pixel_type.is_recognized()
    }
}

impl std::fmt::Display for HeaderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} '{}' {}x{}x{} {} {} data@{}",
            self.variant.short_name(),
            self.embedded_name,
            self.width,
            self.height,
            self.frame_count,
            self.pixel_type,
            self.byte_order,
            self.pixel_data_offset
        )
    }
}
