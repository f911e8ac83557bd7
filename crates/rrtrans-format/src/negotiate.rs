use tracing::debug;

use crate::compress::Compression;
use crate::error::{FormatError, Result};
use crate::flags::FrameFlags;
use crate::pixel::{lookup, PixelFormat};

/// Rows are padded to this many bytes.
pub const ROW_ALIGNMENT: usize = 4;

/// Outcome of format negotiation for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiated {
    /// Compression mode stamped on the frame.
    pub compression: Compression,
    /// Buffer flags passed to the transport.
    pub flags: FrameFlags,
    /// Bytes per pixel.
    pub pixel_size: u8,
    /// Canonical format matching `flags` and `pixel_size`.
    pub format: PixelFormat,
}

/// Decide the buffer layout for a frame.
///
/// Uncompressed RGB frames always use the transport's own layout (packed RGB,
/// bottom-up), so the requested format only matters for JPEG-like frames.
pub fn negotiate(preference: Compression, requested: PixelFormat) -> Result<Negotiated> {
    let compression = preference.effective();
    let mut flags = FrameFlags::BOTTOM_UP;
    let mut pixel_size = 3u8;

    if compression != Compression::Rgb {
        match requested {
            PixelFormat::Rgb => {}
            PixelFormat::Bgr => flags |= FrameFlags::BGR,
            PixelFormat::Rgba => pixel_size = 4,
            PixelFormat::Bgra => {
                flags |= FrameFlags::BGR;
                pixel_size = 4;
            }
            PixelFormat::Abgr => {
                flags |= FrameFlags::BGR | FrameFlags::ALPHA_FIRST;
                pixel_size = 4;
            }
            PixelFormat::Argb => {
                flags |= FrameFlags::ALPHA_FIRST;
                pixel_size = 4;
            }
        }
    }

    let bgr = flags.is_bgr();
    let alpha_first = flags.is_alpha_first();
    let format = lookup(bgr, alpha_first, pixel_size).ok_or(FormatError::NoMatchingFormat {
        bgr,
        alpha_first,
        pixel_size,
    })?;

    debug!(
        ?preference,
        ?requested,
        ?compression,
        flags = flags.bits(),
        pixel_size,
        %format,
        "negotiated frame layout"
    );

    Ok(Negotiated {
        compression,
        flags,
        pixel_size,
        format,
    })
}

/// Bytes per row for `width` pixels, padded to [`ROW_ALIGNMENT`].
pub fn row_pitch(width: u32, pixel_size: u8) -> usize {
    let raw = width as usize * pixel_size as usize;
    raw.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_mode_follows_requested_layout() {
        let cases = [
            (PixelFormat::Rgb, false, false, 3),
            (PixelFormat::Bgr, true, false, 3),
            (PixelFormat::Rgba, false, false, 4),
            (PixelFormat::Bgra, true, false, 4),
            (PixelFormat::Abgr, true, true, 4),
            (PixelFormat::Argb, false, true, 4),
        ];

        for (requested, bgr, alpha_first, pixel_size) in cases {
            let n = negotiate(Compression::Jpeg, requested).unwrap();
            assert_eq!(n.compression, Compression::Jpeg);
            assert!(n.flags.contains(FrameFlags::BOTTOM_UP));
            assert_eq!(n.flags.is_bgr(), bgr, "{requested}");
            assert_eq!(n.flags.is_alpha_first(), alpha_first, "{requested}");
            assert_eq!(n.pixel_size, pixel_size, "{requested}");
            assert_eq!(n.format, requested);
        }
    }

    #[test]
    fn jpeg_negotiation_is_a_bijection() {
        let mut seen: Vec<PixelFormat> = PixelFormat::ALL
            .into_iter()
            .map(|f| negotiate(Compression::Jpeg, f).unwrap().format)
            .collect();
        seen.sort_by_key(|f| f.index());
        seen.dedup();
        assert_eq!(seen.len(), PixelFormat::ALL.len());
    }

    #[test]
    fn uncompressed_modes_ignore_requested_format() {
        for preference in [Compression::Proxy, Compression::Rgb] {
            for requested in PixelFormat::ALL {
                let n = negotiate(preference, requested).unwrap();
                assert_eq!(n.compression, Compression::Rgb);
                assert_eq!(n.flags, FrameFlags::BOTTOM_UP);
                assert_eq!(n.pixel_size, 3);
                assert_eq!(n.format, PixelFormat::Rgb);
            }
        }
    }

    #[test]
    fn rgb_preference_overrides_argb_request() {
        let n = negotiate(Compression::Rgb, PixelFormat::Argb).unwrap();
        assert_eq!(n.pixel_size, 3);
        assert!(!n.flags.is_bgr());
        assert!(!n.flags.is_alpha_first());
        assert_eq!(n.format, PixelFormat::Rgb);
    }

    #[test]
    fn unknown_preference_negotiates_as_jpeg() {
        let n = negotiate(Compression::from_raw(42), PixelFormat::Abgr).unwrap();
        assert_eq!(n.compression, Compression::Jpeg);
        assert_eq!(n.format, PixelFormat::Abgr);
    }

    #[test]
    fn pitch_is_padded_to_four_bytes() {
        assert_eq!(row_pitch(640, 4), 2560);
        assert_eq!(row_pitch(640, 3), 1920);
        assert_eq!(row_pitch(5, 3), 16);
        assert_eq!(row_pitch(1, 3), 4);
        assert_eq!(row_pitch(0, 3), 0);
    }
}
