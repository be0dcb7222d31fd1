pub mod error;
pub mod frames;
pub mod header;
pub mod poller;
mod traits;
mod types;

pub use error::{CoreError, Result};
pub use frames::{FrameRangeResolver, FrameRequest, FrameSelection, Resolution, load_request};
pub use header::{HeaderDescriptor, HeaderFields, HeaderParser, HeaderWriter};
pub use poller::{
    LiveUpdatePoller, PollOutcome, PollerConfig, PollerState, StopHandle, WatchEvent,
};
pub use traits::{
    BlockSource, FrameBuffer, FrameHost, HeaderSource, LoadRequest, RawImageLoader,
    RawImageRequest,
};
pub use types::{ByteOrder, FormatVariant, PixelType};
