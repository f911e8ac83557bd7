use bytes::{Buf, BufMut, Bytes, BytesMut};
use rrtrans_format::{Compression, FrameFlags, Subsampling};

use crate::error::{Result, WireError};

/// Header size in bytes.
pub const HEADER_SIZE: usize = 40;

/// Magic bytes: "RR" (0x52 0x52).
pub const MAGIC: [u8; 2] = [0x52, 0x52];

/// Wire protocol version.
pub const VERSION: u8 = 1;

/// Default maximum payload size: 256 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 256 * 1024 * 1024;

/// Which image of a (possibly stereo) frame a message carries.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Eye {
    /// Left eye, or the only image of a mono frame.
    #[default]
    Left = 0,
    Right = 1,
}

/// Per-frame metadata sent ahead of the pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub flags: FrameFlags,
    pub compression: Compression,
    pub quality: u8,
    pub subsampling: Subsampling,
    pub eye: Eye,
    pub width: u32,
    pub height: u32,
    pub pitch: u32,
    pub pixel_size: u8,
    pub window_id: u64,
    pub frame_id: u32,
}

impl FrameHeader {
    /// Expected payload size for this header's geometry.
    pub fn payload_len(&self) -> usize {
        self.pitch as usize * self.height as usize
    }
}

/// A decoded frame message.
#[derive(Debug, Clone)]
pub struct WireFrame {
    pub header: FrameHeader,
    pub payload: Bytes,
}

/// Encode a frame header for a payload of `payload_len` bytes.
///
/// Wire format:
/// ```text
/// ┌────────┬─────┬───────┬──────┬──────┬────────┬─────┐
/// │ "RR"   │ ver │ flags │ comp │ qual │ subsamp│ eye │  8 bytes
/// ├────────┴─────┴───────┼──────┴──────┴────────┴─────┤
/// │ width (u32 LE)       │ height (u32 LE)            │  8 bytes
/// ├──────────────────────┼──────┬─────────────────────┤
/// │ pitch (u32 LE)       │ ps   │ reserved (3)        │  8 bytes
/// ├──────────────────────┴──────┴─────────────────────┤
/// │ window id (u64 LE)                                │  8 bytes
/// ├──────────────────────┬────────────────────────────┤
/// │ frame id (u32 LE)    │ payload length (u32 LE)    │  8 bytes
/// └──────────────────────┴────────────────────────────┘
/// ```
pub fn encode_header(header: &FrameHeader, payload_len: usize, dst: &mut BytesMut) -> Result<()> {
    let expected = header.payload_len();
    if payload_len != expected {
        return Err(WireError::PayloadMismatch {
            expected,
            actual: payload_len,
        });
    }
    let len = u32::try_from(payload_len).map_err(|_| WireError::PayloadTooLarge {
        size: payload_len,
        max: u32::MAX as usize,
    })?;

    dst.reserve(HEADER_SIZE);
    dst.put_slice(&MAGIC);
    dst.put_u8(VERSION);
    dst.put_u8(header.flags.bits());
    dst.put_u8(header.compression.as_raw() as u8);
    dst.put_u8(header.quality);
    dst.put_u8(header.subsampling.as_raw() as u8);
    dst.put_u8(header.eye as u8);
    dst.put_u32_le(header.width);
    dst.put_u32_le(header.height);
    dst.put_u32_le(header.pitch);
    dst.put_u8(header.pixel_size);
    dst.put_bytes(0, 3);
    dst.put_u64_le(header.window_id);
    dst.put_u32_le(header.frame_id);
    dst.put_u32_le(len);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<WireFrame>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    if src[0..2] != MAGIC {
        return Err(WireError::InvalidMagic);
    }
    if src[2] != VERSION {
        return Err(WireError::UnsupportedVersion(src[2]));
    }

    let mut head = &src[3..HEADER_SIZE];
    let flags = FrameFlags::from_bits_truncate(head.get_u8());
    let compression = Compression::from_raw(i32::from(head.get_u8()));
    let quality = head.get_u8();
    let raw_subsamp = head.get_u8();
    let subsampling =
        Subsampling::from_raw(i32::from(raw_subsamp)).ok_or(WireError::InvalidField {
            field: "subsampling",
            value: u64::from(raw_subsamp),
        })?;
    let eye = match head.get_u8() {
        0 => Eye::Left,
        1 => Eye::Right,
        other => {
            return Err(WireError::InvalidField {
                field: "eye",
                value: u64::from(other),
            })
        }
    };
    let width = head.get_u32_le();
    let height = head.get_u32_le();
    let pitch = head.get_u32_le();
    let pixel_size = head.get_u8();
    head.advance(3);
    let window_id = head.get_u64_le();
    let frame_id = head.get_u32_le();
    let payload_len = head.get_u32_le() as usize;

    if payload_len > max_payload {
        return Err(WireError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let header = FrameHeader {
        flags,
        compression,
        quality,
        subsampling,
        eye,
        width,
        height,
        pitch,
        pixel_size,
        window_id,
        frame_id,
    };
    if header.payload_len() != payload_len {
        return Err(WireError::PayloadMismatch {
            expected: header.payload_len(),
            actual: payload_len,
        });
    }

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        src.reserve(total - src.len());
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(WireFrame { header, payload }))
}

/// Configuration for the wire codec.
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Maximum payload size in bytes. Default: 256 MiB.
    pub max_payload_size: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}
