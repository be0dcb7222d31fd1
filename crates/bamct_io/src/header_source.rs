use crate::reader::DiskReader;
use bamct_core::{HeaderDescriptor, HeaderParser, HeaderSource, PixelType, Result};
use std::path::Path;
use tracing::warn;

/// Header parser bound to one open file.
///
/// Every call re-reads the header from offset 0 through the same handle,
/// so a watcher sees the frame count the writer last flushed. An
/// unrecognized pixel type is warned about once per distinct code.
pub struct FileHeaderSource {
    reader: DiskReader,
    parser: HeaderParser,
    reported_pixel_code: Option<u32>,
}

impl FileHeaderSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            reader: DiskReader::new(path)?,
            parser: HeaderParser::new(),
            reported_pixel_code: None,
        })
    }

    /// Returns true when `pixel_type` is an unrecognized code not yet
    /// reported by this source.
    fn note_pixel_type(&mut self, pixel_type: PixelType) -> bool {
        if pixel_type.is_recognized() || self.reported_pixel_code == Some(pixel_type.code()) {
            return false;
        }
        self.reported_pixel_code = Some(pixel_type.code());
        true
    }
}

impl HeaderSource for FileHeaderSource {
    fn read_header(&mut self) -> Result<HeaderDescriptor> {
        let descriptor = self.parser.parse_from(&mut self.reader)?;

        if self.note_pixel_type(descriptor.pixel_type) {
            warn!(
                name = %descriptor.embedded_name,
                code = descriptor.pixel_type.code(),
                "unknown data type, using the raw code as the sample size"
            );
        }

        Ok(descriptor)
    }
}
