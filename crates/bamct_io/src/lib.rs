mod header_source;
mod mmap_reader;
mod raw_loader;
mod reader;

pub use header_source::FileHeaderSource;
pub use mmap_reader::MmapReader;
pub use raw_loader::RawFileLoader;
pub use reader::DiskReader;

use bamct_core::{HeaderDescriptor, HeaderSource, Result};
use std::path::Path;

/// Opens `path` and parses its header once.
pub fn read_header(path: impl AsRef<Path>) -> Result<HeaderDescriptor> {
    FileHeaderSource::open(path)?.read_header()
}
