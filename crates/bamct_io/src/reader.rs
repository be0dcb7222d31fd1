//! Positioned reads on a file held open for the reader's lifetime.

use bamct_core::{BlockSource, Result};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// A read-only block source over a regular file.
///
/// The file handle is opened once and released when the reader is
/// dropped. Its size is re-queried on every call because acquisition
/// files keep growing while they are being watched.
///
/// # Example
///
/// ```ignore
/// use bamct_io::DiskReader;
/// use bamct_core::BlockSource;
///
/// let mut reader = DiskReader::new("scan0001.dd")?;
/// let mut header = vec![0u8; 52];
/// let bytes_read = reader.read_chunk(0, &mut header)?;
/// ```
pub struct DiskReader {
    file: File,
}

impl DiskReader {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(false)
            .open(path.as_ref())?;

        #[cfg(target_os = "linux")]
        {
            use rustix::fs::{Advice, fadvise};

            let _ = fadvise(&file, 0, None, Advice::Random);
        }

        Ok(Self { file })
    }
}

impl BlockSource for DiskReader {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        let bytes_read = self.file.read(buffer)?;

        Ok(bytes_read)
    }

    fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_disk_reader_basic() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let test_data = b"scan0001d00l and then some field bytes";
        temp_file.write_all(test_data).unwrap();
        temp_file.flush().unwrap();
        let mut reader = DiskReader::new(temp_file.path()).unwrap();

        assert_eq!(reader.size().unwrap(), test_data.len() as u64);

        let mut buffer = vec![0u8; 12];
        let bytes_read = reader.read_chunk(0, &mut buffer).unwrap();
        assert_eq!(bytes_read, 12);
        assert_eq!(&buffer, b"scan0001d00l");

        let mut buffer = vec![0u8; 4];
        let bytes_read = reader.read_chunk(17, &mut buffer).unwrap();
        assert_eq!(bytes_read, 4);
        assert_eq!(&buffer, b"then");
    }

    #[test]
    fn test_disk_reader_sees_growth() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"Short").unwrap();
        temp_file.flush().unwrap();

        let mut reader = DiskReader::new(temp_file.path()).unwrap();
        assert_eq!(reader.size().unwrap(), 5);

        temp_file.write_all(b" and longer").unwrap();
        temp_file.flush().unwrap();
        assert_eq!(reader.size().unwrap(), 16);

        let mut buffer = vec![0u8; 100];
        let bytes_read = reader.read_chunk(0, &mut buffer).unwrap();
        assert_eq!(bytes_read, 16);
    }

    #[test]
    fn test_disk_reader_missing_file() {
        assert!(DiskReader::new("/nonexistent/scan0001.dd").is_err());
    }
}
