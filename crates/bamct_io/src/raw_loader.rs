use crate::mmap_reader::MmapReader;
use bamct_core::{CoreError, FrameBuffer, RawImageLoader, RawImageRequest, Result};

/// Reference raw loader: copies the undecoded bytes of the requested
/// frames out of a fresh mapping of the file.
///
/// The file is mapped anew for each request since frames may have been
/// appended since the last one. A range reaching past the end of the
/// file is a [`CoreError::ShortRead`].
#[derive(Debug, Default)]
pub struct RawFileLoader {
    loads: u64,
}

impl RawFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loads(&self) -> u64 {
        self.loads
    }
}

impl RawImageLoader for RawFileLoader {
    fn load_raw_image(&mut self, request: &RawImageRequest) -> Result<FrameBuffer> {
        let expected = request.total_bytes().ok_or_else(|| {
            CoreError::OffsetOverflow(format!(
                "{} frames of {}x{}",
                request.frame_count, request.width, request.height
            ))
        })?;
        let len = usize::try_from(expected)
            .map_err(|_| CoreError::OffsetOverflow(format!("{expected} bytes")))?;

        let reader = MmapReader::new(&request.path)?;
        let data = reader
            .slice(request.byte_offset, len)
            .map(<[u8]>::to_vec)
            .unwrap_or_default();

        if data.len() != len {
            return Err(CoreError::ShortRead {
                offset: request.byte_offset,
                expected,
                actual: data.len() as u64,
            });
        }

        self.loads += 1;
        tracing::debug!(
            path = %request.path.display(),
            offset = request.byte_offset,
            frames = request.frame_count,
            bytes = len,
            "loaded raw frames"
        );

        Ok(FrameBuffer {
            request: request.clone(),
            data,
        })
    }
}
