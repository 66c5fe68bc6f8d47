pub mod header;
pub mod reader;
pub mod tag;

pub use header::{FileHeader, PREAMBLE_SIZE};
pub use reader::TagReader;
pub use tag::{
    AudioPacketHeader, Tag, TagKind, VideoPacketHeader, BACK_POINTER_SIZE, TAG_HEADER_SIZE,
};
