//! Canonical pixel formats.
//!
//! The six identifiers are fixed, and their order is part of the contract:
//! it is both the identifier value and the row order of [`FORMAT_TABLE`],
//! which decides ties during reverse lookup.

use crate::error::FormatError;

/// Number of canonical pixel formats.
pub const FORMAT_COUNT: usize = 6;

/// A canonical pixel format identifier.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    #[default]
    Rgb = 0,
    Bgr = 1,
    Rgba = 2,
    Bgra = 3,
    Abgr = 4,
    Argb = 5,
}

/// Layout of one canonical pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    /// Blue component first.
    pub bgr: bool,
    /// Alpha/padding byte before the color components.
    pub alpha_first: bool,
    /// Bytes per pixel (3 or 4).
    pub pixel_size: u8,
}

impl FormatDescriptor {
    const fn new(bgr: bool, alpha_first: bool, pixel_size: u8) -> Self {
        Self {
            bgr,
            alpha_first,
            pixel_size,
        }
    }
}

/// Format table, indexed by [`PixelFormat`] discriminant.
pub const FORMAT_TABLE: [FormatDescriptor; FORMAT_COUNT] = [
    FormatDescriptor::new(false, false, 3), // RGB
    FormatDescriptor::new(true, false, 3),  // BGR
    FormatDescriptor::new(false, false, 4), // RGBA
    FormatDescriptor::new(true, false, 4),  // BGRA
    FormatDescriptor::new(true, true, 4),   // ABGR
    FormatDescriptor::new(false, true, 4),  // ARGB
];

impl PixelFormat {
    /// All formats in table order.
    pub const ALL: [PixelFormat; FORMAT_COUNT] = [
        PixelFormat::Rgb,
        PixelFormat::Bgr,
        PixelFormat::Rgba,
        PixelFormat::Bgra,
        PixelFormat::Abgr,
        PixelFormat::Argb,
    ];

    /// Table row index of this format.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Layout descriptor for this format.
    pub fn descriptor(self) -> FormatDescriptor {
        FORMAT_TABLE[self.index()]
    }

    /// Bytes per pixel.
    pub fn pixel_size(self) -> u8 {
        self.descriptor().pixel_size
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgb => "RGB",
            PixelFormat::Bgr => "BGR",
            PixelFormat::Rgba => "RGBA",
            PixelFormat::Bgra => "BGRA",
            PixelFormat::Abgr => "ABGR",
            PixelFormat::Argb => "ARGB",
        }
    }

    /// Parse a case-insensitive format name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name))
    }
}

impl TryFrom<i32> for PixelFormat {
    type Error = FormatError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(FormatError::UnknownFormat(value))
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a layout back to its canonical format.
///
/// Rows are scanned in table order and the first match wins.
pub fn lookup(bgr: bool, alpha_first: bool, pixel_size: u8) -> Option<PixelFormat> {
    let wanted = FormatDescriptor::new(bgr, alpha_first, pixel_size);
    FORMAT_TABLE
        .iter()
        .position(|row| *row == wanted)
        .map(|index| PixelFormat::ALL[index])
}
