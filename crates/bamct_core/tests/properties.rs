use bamct_core::header::{
    BYTE_ORDER_MARKER_INDEX, HEADER_LEN, MIN_PIXEL_DATA_OFFSET, VARIANT_MARKER_INDEX,
    byte_order_of, pixel_data_offset, variant_of,
};
use bamct_core::{
    ByteOrder, FormatVariant, FrameRangeResolver, FrameRequest, HeaderFields, HeaderParser,
    HeaderWriter, PixelType,
};
use proptest::prelude::*;

fn pixel_type() -> impl Strategy<Value = PixelType> {
    prop_oneof![
        Just(PixelType::Byte),
        Just(PixelType::Unsigned16),
        Just(PixelType::Float32),
    ]
}

proptest! {
    #[test]
    fn byte_order_depends_only_on_twelfth_char(
        mut name in any::<[u8; 12]>(),
        other in any::<[u8; 12]>(),
    ) {
        let order = byte_order_of(&name);
        let marker = name[BYTE_ORDER_MARKER_INDEX];
        name = other;
        name[BYTE_ORDER_MARKER_INDEX] = marker;
        prop_assert_eq!(byte_order_of(&name), order);
        prop_assert_eq!(order == ByteOrder::BigEndian, marker == b'x');
    }

    #[test]
    fn variant_depends_only_on_ninth_char(
        mut name in any::<[u8; 12]>(),
        other in any::<[u8; 12]>(),
    ) {
        let variant = variant_of(&name);
        let marker = name[VARIANT_MARKER_INDEX];
        name = other;
        name[VARIANT_MARKER_INDEX] = marker;
        prop_assert_eq!(variant_of(&name), variant);
        prop_assert_eq!(variant == FormatVariant::DataFormat, marker == b'd');
    }

    #[test]
    fn pixel_data_offset_is_padded_multiple(width in 1u32..100_000, code in 1u32..16) {
        let pt = PixelType::from_code(code);
        let unit = u64::from(width) * u64::from(code);
        let offset = pixel_data_offset(width, pt).unwrap();

        prop_assert!(offset >= MIN_PIXEL_DATA_OFFSET);
        prop_assert_eq!(offset % unit, 0);
        // Smallest such multiple.
        prop_assert!(offset - unit < MIN_PIXEL_DATA_OFFSET);
    }

    #[test]
    fn header_round_trip(
        data_format in any::<bool>(),
        big_endian in any::<bool>(),
        width in 1u32..=u32::MAX,
        height in any::<u32>(),
        frames in any::<u32>(),
        pt in pixel_type(),
    ) {
        let variant = if data_format {
            FormatVariant::DataFormat
        } else {
            FormatVariant::ImageFormat
        };
        let order = if big_endian { ByteOrder::BigEndian } else { ByteOrder::LittleEndian };
        let mut fields = HeaderFields::new(variant, order);
        fields.width = width;
        fields.height = height;
        fields.frame_count = frames;
        fields.pixel_type_code = pt.code();

        let bytes = HeaderWriter::new().encode(&fields);
        prop_assert_eq!(bytes.len(), HEADER_LEN);

        let d = HeaderParser::new().parse(&bytes).unwrap();
        prop_assert_eq!(d.variant, variant);
        prop_assert_eq!(d.byte_order, order);
        prop_assert_eq!(d.width, width);
        prop_assert_eq!(d.height, height);
        prop_assert_eq!(d.frame_count, frames);
        prop_assert_eq!(d.pixel_type, pt);
    }

    #[test]
    fn growth_watch_always_picks_newest(total in 1u32..1_000_000) {
        let r = FrameRangeResolver::new().resolve(total, FrameRequest::GROWTH_WATCH).unwrap();
        prop_assert!(r.watch);
        prop_assert_eq!(r.selection.first_frame, total);
        prop_assert_eq!(r.selection.frame_count, 1);
    }

    #[test]
    fn open_ended_ranges_reach_the_last_frame(total in 1u32..10_000, first in 1u32..10_000) {
        prop_assume!(first <= total);
        let r = FrameRangeResolver::new().resolve(total, FrameRequest::new(first, 0)).unwrap();
        prop_assert_eq!(r.selection.first_frame + r.selection.frame_count - 1, total);

        let r = FrameRangeResolver::new().resolve(total, FrameRequest::new(0, first)).unwrap();
        prop_assert_eq!(r.selection.first_frame + r.selection.frame_count - 1, total);
    }
}
