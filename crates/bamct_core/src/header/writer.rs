use super::{
    BIG_ENDIAN_MARKER, BYTE_ORDER_MARKER_INDEX, DATA_FORMAT_MARKER, EMBEDDED_NAME_LEN,
    HEADER_FIELD_COUNT, HEADER_LEN, VARIANT_MARKER_INDEX, layout_of, pixel_data_offset,
};
use crate::error::Result;
use crate::types::{ByteOrder, FormatVariant, PixelType};

/// Values written into a synthetic header. Reserved fields are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFields {
    pub stem: String,
    pub variant: FormatVariant,
    pub byte_order: ByteOrder,
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub pixel_type_code: u32,
}

impl HeaderFields {
    pub fn new(variant: FormatVariant, byte_order: ByteOrder) -> Self {
        Self {
            stem: "bamct".to_string(),
            variant,
            byte_order,
            width: 0,
            height: 0,
            frame_count: 0,
            pixel_type_code: PixelType::Unsigned16.code(),
        }
    }

    /// Builds the 12-character embedded name: the stem padded or cut to
    /// the marker position, then the variant and byte-order markers.
    pub fn embedded_name(&self) -> [u8; EMBEDDED_NAME_LEN] {
        let mut name = [b'0'; EMBEDDED_NAME_LEN];
        for (slot, b) in name[..VARIANT_MARKER_INDEX]
            .iter_mut()
            .zip(self.stem.bytes())
        {
            *slot = b;
        }
        name[VARIANT_MARKER_INDEX] = match self.variant {
            FormatVariant::DataFormat => DATA_FORMAT_MARKER,
            FormatVariant::ImageFormat => b'i',
        };
        name[BYTE_ORDER_MARKER_INDEX] = match self.byte_order {
            ByteOrder::BigEndian => BIG_ENDIAN_MARKER,
            ByteOrder::LittleEndian => b'l',
        };
        name
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderWriter;

impl HeaderWriter {
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    pub fn encode(&self, fields: &HeaderFields) -> Vec<u8> {
        let layout = layout_of(fields.variant);
        let mut values = [0u32; HEADER_FIELD_COUNT];
        values[layout.width] = fields.width;
        values[layout.height] = fields.height;
        values[layout.frame_count] = fields.frame_count;
        values[layout.pixel_type] = fields.pixel_type_code;

        let mut out = Vec::with_capacity(HEADER_LEN);
        out.extend_from_slice(&fields.embedded_name());
        for value in values {
            out.extend_from_slice(&fields.byte_order.write_u32(value));
        }
        out
    }

    /// Header followed by zero padding up to the pixel-data offset.
    pub fn encode_padded(&self, fields: &HeaderFields) -> Result<Vec<u8>> {
        let offset = pixel_data_offset(
            fields.width,
            PixelType::from_code(fields.pixel_type_code),
        )?;
        let mut out = self.encode(fields);
        let target = (offset as usize).max(out.len());
        out.resize(target, 0);
        Ok(out)
    }
}
