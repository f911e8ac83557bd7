//! Frame header + pixel payload wire codec.
//!
//! Every transmitted image (each eye, for stereo frames) is one message:
//! - A fixed 40-byte little-endian header starting with the magic `"RR"`
//! - `pitch * height` bytes of pixel rows
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, encode_header, Eye, FrameHeader, WireConfig, WireFrame, DEFAULT_MAX_PAYLOAD,
    HEADER_SIZE, MAGIC, VERSION,
};
pub use error::{Result, WireError};
pub use reader::FrameReader;
pub use writer::FrameWriter;
