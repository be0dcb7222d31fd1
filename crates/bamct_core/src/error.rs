use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Header truncated: expected {expected} bytes, got {actual}")]
    TruncatedHeader { expected: usize, actual: usize },

    #[error("Row unit is empty (width {width}, {bytes_per_pixel} bytes per pixel)")]
    EmptyRowUnit { width: u32, bytes_per_pixel: u64 },

    #[error("Byte offset overflows u64: {0}")]
    OffsetOverflow(String),

    #[error("Invalid frame selection: {0}")]
    InvalidSelection(String),

    #[error("Short read at offset {offset}: expected {expected} bytes, got {actual}")]
    ShortRead {
        offset: u64,
        expected: u64,
        actual: u64,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl CoreError {
    /// True for the failures that mean the header could not be read:
    /// an I/O error, a truncated header, or a zero-sized row unit.
    #[must_use]
    pub fn is_header_read_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::TruncatedHeader { .. } | Self::EmptyRowUnit { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
