use tracing::debug;

/// Compression preference configured by the host.
///
/// Raw values follow the plugin ABI: proxy = 0, JPEG = 1, RGB = 2.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// Passthrough to the host's own image transport.
    Proxy = 0,
    /// JPEG-like lossy compression.
    #[default]
    Jpeg = 1,
    /// Uncompressed RGB.
    Rgb = 2,
}

impl Compression {
    /// Decode a raw preference. Anything unrecognized collapses to JPEG.
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => Compression::Proxy,
            1 => Compression::Jpeg,
            2 => Compression::Rgb,
            other => {
                debug!(value = other, "unknown compression preference, using jpeg");
                Compression::Jpeg
            }
        }
    }

    /// The mode frames are actually sent with.
    ///
    /// Proxy and RGB both transmit uncompressed RGB; everything else is JPEG.
    pub fn effective(self) -> Self {
        match self {
            Compression::Proxy | Compression::Rgb => Compression::Rgb,
            Compression::Jpeg => Compression::Jpeg,
        }
    }

    /// Wire value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Compression::Proxy => "proxy",
            Compression::Jpeg => "jpeg",
            Compression::Rgb => "rgb",
        }
    }
}

/// Chroma subsampling level applied by JPEG-like compression.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Subsampling {
    #[default]
    S444 = 0,
    S422 = 1,
    S420 = 2,
    Gray = 3,
}

impl Subsampling {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Subsampling::S444),
            1 => Some(Subsampling::S422),
            2 => Some(Subsampling::S420),
            3 => Some(Subsampling::Gray),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Subsampling::S444 => "4:4:4",
            Subsampling::S422 => "4:2:2",
            Subsampling::S420 => "4:2:0",
            Subsampling::Gray => "gray",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_preference_collapses_to_jpeg() {
        assert_eq!(Compression::from_raw(3), Compression::Jpeg);
        assert_eq!(Compression::from_raw(-7), Compression::Jpeg);
        assert_eq!(Compression::from_raw(2), Compression::Rgb);
    }

    #[test]
    fn proxy_sends_rgb() {
        assert_eq!(Compression::Proxy.effective(), Compression::Rgb);
        assert_eq!(Compression::Rgb.effective(), Compression::Rgb);
        assert_eq!(Compression::Jpeg.effective(), Compression::Jpeg);
    }

    #[test]
    fn subsampling_raw_values() {
        assert_eq!(Subsampling::from_raw(2), Some(Subsampling::S420));
        assert_eq!(Subsampling::from_raw(4), None);
        assert_eq!(Subsampling::Gray.as_raw(), 3);
    }
}
