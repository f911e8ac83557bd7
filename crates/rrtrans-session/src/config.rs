use std::sync::{Arc, RwLock};

use rrtrans_format::{Compression, Subsampling};
use tracing::warn;

/// Default JPEG quality.
pub const DEFAULT_QUALITY: u8 = 95;

/// Host-supplied image settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Compression preference.
    pub compression: Compression,
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Chroma subsampling for JPEG frames.
    pub subsampling: Subsampling,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compression: Compression::Jpeg,
            quality: DEFAULT_QUALITY,
            subsampling: Subsampling::S444,
        }
    }
}

impl Config {
    /// Build a config from raw host values.
    ///
    /// Quality is clamped to 1-100 and unknown subsampling levels fall back
    /// to 4:4:4.
    pub fn from_raw(compress: i32, quality: i32, subsamp: i32) -> Self {
        let clamped = quality.clamp(1, 100);
        if clamped != quality {
            warn!(quality, clamped, "quality out of range");
        }
        let subsampling = Subsampling::from_raw(subsamp).unwrap_or_else(|| {
            warn!(subsamp, "unknown subsampling level, using 4:4:4");
            Subsampling::S444
        });

        Self {
            compression: Compression::from_raw(compress),
            quality: clamped as u8,
            subsampling,
        }
    }
}

/// Where a session reads its configuration from.
///
/// The session takes a fresh snapshot at allocation and again at send time,
/// so settings changed in between apply to the frame being sent.
pub trait ConfigSource {
    fn snapshot(&self) -> Config;
}

impl ConfigSource for Config {
    fn snapshot(&self) -> Config {
        *self
    }
}

impl ConfigSource for Arc<RwLock<Config>> {
    fn snapshot(&self) -> Config {
        *self.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Host window the session's frames belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_clamps_and_defaults() {
        let config = Config::from_raw(2, 250, 9);
        assert_eq!(config.compression, Compression::Rgb);
        assert_eq!(config.quality, 100);
        assert_eq!(config.subsampling, Subsampling::S444);

        let config = Config::from_raw(77, 0, 2);
        assert_eq!(config.compression, Compression::Jpeg);
        assert_eq!(config.quality, 1);
        assert_eq!(config.subsampling, Subsampling::S420);
    }

    #[test]
    fn shared_config_reflects_updates() {
        let shared = Arc::new(RwLock::new(Config::default()));
        assert_eq!(shared.snapshot().quality, DEFAULT_QUALITY);

        shared.write().unwrap().quality = 40;
        assert_eq!(shared.snapshot().quality, 40);
    }

    #[test]
    fn window_id_displays_as_hex() {
        assert_eq!(WindowId(0x400007).to_string(), "0x400007");
    }
}
