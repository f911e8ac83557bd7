use std::ffi::c_void;
use std::os::raw::c_int;

use rrtrans_session::{Config, ConfigSource, Session};
use rrtrans_transport::TcpTransport;

/// Status returned on success.
pub const RRTRANS_OK: c_int = 0;
/// Status returned on failure; details via `RRTransGetError`.
pub const RRTRANS_ERROR: c_int = -1;

pub const RRTRANS_RGB: c_int = 0;
pub const RRTRANS_BGR: c_int = 1;
pub const RRTRANS_RGBA: c_int = 2;
pub const RRTRANS_BGRA: c_int = 3;
pub const RRTRANS_ABGR: c_int = 4;
pub const RRTRANS_ARGB: c_int = 5;
/// Number of pixel format options.
pub const RRTRANS_FORMATOPT: c_int = 6;

pub const RRCOMP_PROXY: c_int = 0;
pub const RRCOMP_JPEG: c_int = 1;
pub const RRCOMP_RGB: c_int = 2;

/// Host configuration read by the plugin. Owned by the host, which must keep
/// it alive for the whole session.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RRConfig {
    pub compress: c_int,
    pub qual: c_int,
    pub subsamp: c_int,
}

/// Host-visible frame record.
#[repr(C)]
#[derive(Debug)]
pub struct RRFrame {
    pub w: c_int,
    pub h: c_int,
    pub pitch: c_int,
    pub bits: *mut u8,
    pub rbits: *mut u8,
    pub format: c_int,
    pub opaque: *mut c_void,
}

impl Default for RRFrame {
    fn default() -> Self {
        Self {
            w: 0,
            h: 0,
            pitch: 0,
            bits: std::ptr::null_mut(),
            rbits: std::ptr::null_mut(),
            format: RRTRANS_RGB,
            opaque: std::ptr::null_mut(),
        }
    }
}

pub type RRTransHandle = *mut c_void;

/// Reads the host's `RRConfig` on every snapshot, so edits made by the host
/// between `RRTransGetFrame` and `RRTransSendFrame` are honored.
pub(crate) struct HostConfig(pub(crate) *const RRConfig);

impl ConfigSource for HostConfig {
    fn snapshot(&self) -> Config {
        // SAFETY: `RRTransInit` rejects null, and the host keeps the config
        // alive for the session's lifetime.
        let raw = unsafe { *self.0 };
        Config::from_raw(raw.compress, raw.qual, raw.subsamp)
    }
}

pub(crate) struct SessionHandle {
    pub(crate) session: Session<TcpTransport, HostConfig>,
}
