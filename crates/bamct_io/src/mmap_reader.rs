use bamct_core::{BlockSource, CoreError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Read-only mapping of a file as it was when the reader was created.
pub struct MmapReader {
    mmap: Mmap,
    size: u64,
}

impl MmapReader {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;

        let size = file.metadata()?.len();

        if size == 0 {
            return Err(CoreError::InvalidFormat(
                "acquisition file is empty".to_string(),
            ));
        }

        // Safety: the mapping is read-only; writers only append frames and
        // rewrite header fields, which never shrinks the mapped range.
        let mmap =
            unsafe { Mmap::map(&file) }.map_err(|e| CoreError::Io(std::io::Error::other(e)))?;

        #[cfg(target_os = "linux")]
        {
            use memmap2::Advice;
            let _ = mmap.advise(Advice::Sequential);
        }

        Ok(Self { mmap, size })
    }

    #[inline]
    pub fn slice(&self, offset: u64, len: usize) -> Option<&[u8]> {
        let start = usize::try_from(offset).ok()?;
        if start >= self.mmap.len() {
            return None;
        }
        let end = start.saturating_add(len).min(self.mmap.len());
        Some(&self.mmap[start..end])
    }
}

impl BlockSource for MmapReader {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        let Some(mapped) = self.slice(offset, buffer.len()) else {
            return Ok(0);
        };
        buffer[..mapped.len()].copy_from_slice(mapped);

        Ok(mapped.len())
    }

    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}
