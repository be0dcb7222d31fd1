use super::{
    BIG_ENDIAN_MARKER, BYTE_ORDER_MARKER_INDEX, DATA_FORMAT_MARKER, EMBEDDED_NAME_LEN,
    HEADER_FIELD_COUNT, HEADER_LEN, HeaderDescriptor, VARIANT_MARKER_INDEX, layout_of,
    pixel_data_offset,
};
use crate::error::{CoreError, Result};
use crate::traits::BlockSource;
use crate::types::{ByteOrder, FormatVariant, PixelType};

#[inline]
pub fn byte_order_of(name: &[u8; EMBEDDED_NAME_LEN]) -> ByteOrder {
    if name[BYTE_ORDER_MARKER_INDEX] == BIG_ENDIAN_MARKER {
        ByteOrder::BigEndian
    } else {
        ByteOrder::LittleEndian
    }
}

#[inline]
pub fn variant_of(name: &[u8; EMBEDDED_NAME_LEN]) -> FormatVariant {
    if name[VARIANT_MARKER_INDEX] == DATA_FORMAT_MARKER {
        FormatVariant::DataFormat
    } else {
        FormatVariant::ImageFormat
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderParser;

impl HeaderParser {
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    pub fn parse(&self, data: &[u8]) -> Result<HeaderDescriptor> {
        if data.len() < HEADER_LEN {
            return Err(CoreError::TruncatedHeader {
                expected: HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut name = [0u8; EMBEDDED_NAME_LEN];
        name.copy_from_slice(&data[..EMBEDDED_NAME_LEN]);

        let byte_order = byte_order_of(&name);
        let variant = variant_of(&name);

        let mut fields = [0u32; HEADER_FIELD_COUNT];
        for (i, chunk) in data[EMBEDDED_NAME_LEN..HEADER_LEN]
            .chunks_exact(4)
            .enumerate()
        {
            fields[i] = byte_order.read_u32([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let layout = layout_of(variant);
        let width = fields[layout.width];
        let height = fields[layout.height];
        let frame_count = fields[layout.frame_count];
        let pixel_type = PixelType::from_code(fields[layout.pixel_type]);

        // Each byte is one character, whatever its value.
        let embedded_name: String = name.iter().map(|&b| char::from(b)).collect();

        if !pixel_type.is_recognized() {
            tracing::debug!(
                name = %embedded_name,
                code = pixel_type.code(),
                "unknown data type, using the raw code as the sample size"
            );
        }

        let pixel_data_offset = pixel_data_offset(width, pixel_type)?;

        let descriptor = HeaderDescriptor {
            embedded_name,
            byte_order,
            variant,
            width,
            height,
            frame_count,
            pixel_type,
            pixel_data_offset,
        };
        tracing::debug!(%descriptor, "parsed header");

        Ok(descriptor)
    }

    /// Reads the header from the start of `source` and parses it.
    pub fn parse_from<S: BlockSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<HeaderDescriptor> {
        let mut buffer = [0u8; HEADER_LEN];
        let mut filled = 0;

        while filled < HEADER_LEN {
            let n = source.read_chunk(filled as u64, &mut buffer[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        self.parse(&buffer[..filled])
    }
}
