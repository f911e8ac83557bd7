//! Pixel format table and layout negotiation.
//!
//! This is the lowest layer of rrtrans. A host asks for frames in one of six
//! canonical byte layouts; the negotiator combines that request with the
//! configured compression preference and decides the layout the transport
//! actually allocates:
//! - effective compression mode (uncompressed RGB or JPEG-like)
//! - buffer flags (bottom-up rows, BGR byte order, alpha-first)
//! - pixel stride (3 or 4 bytes)
//!
//! The resulting triple is resolved back to a canonical [`PixelFormat`] via the
//! compiled-in [`FORMAT_TABLE`].

pub mod compress;
pub mod error;
pub mod flags;
pub mod negotiate;
pub mod pixel;

pub use compress::{Compression, Subsampling};
pub use error::{FormatError, Result};
pub use flags::FrameFlags;
pub use negotiate::{negotiate, row_pitch, Negotiated, ROW_ALIGNMENT};
pub use pixel::{lookup, FormatDescriptor, PixelFormat, FORMAT_COUNT, FORMAT_TABLE};
