use serde::Serialize;

/// Byte order of the ten header fields and of the pixel samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    #[inline]
    #[must_use]
    pub const fn read_u32(&self, bytes: [u8; 4]) -> u32 {
        match self {
            Self::LittleEndian => u32::from_le_bytes(bytes),
            Self::BigEndian => u32::from_be_bytes(bytes),
        }
    }

    #[inline]
    #[must_use]
    pub const fn write_u32(&self, value: u32) -> [u8; 4] {
        match self {
            Self::LittleEndian => value.to_le_bytes(),
            Self::BigEndian => value.to_be_bytes(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LittleEndian => "little-endian",
            Self::BigEndian => "big-endian",
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Field layout of the header, selected by the embedded file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatVariant {
    /// `.dd` data files: width and frame count precede height.
    DataFormat,
    /// `.db` image files: width and height precede two reserved fields.
    ImageFormat,
}

impl FormatVariant {
    #[must_use]
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::DataFormat => "DD",
            Self::ImageFormat => "DB",
        }
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::DataFormat => "BAM-CT Data Format",
            Self::ImageFormat => "BAM-CT Image Format",
        }
    }
}

impl std::fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.short_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PixelType {
    Byte,
    Unsigned16,
    Float32,
    /// A type code outside {1, 2, 4}. The code is still used as the
    /// sample size when computing offsets.
    Unrecognized(u32),
}

impl PixelType {
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Byte,
            2 => Self::Unsigned16,
            4 => Self::Float32,
            other => Self::Unrecognized(other),
        }
    }

    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Unsigned16 => 2,
            Self::Float32 => 4,
            Self::Unrecognized(code) => *code,
        }
    }

    /// The format's type code doubles as the sample size in bytes.
    #[inline]
    #[must_use]
    pub const fn bytes_per_pixel(&self) -> u64 {
        self.code() as u64
    }

    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Byte => "8-bit unsigned",
            Self::Unsigned16 => "16-bit unsigned",
            Self::Float32 => "32-bit float",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized(code) => write!(f, "unrecognized (code {code})"),
            _ => write!(f, "{}", self.name()),
        }
    }
}
