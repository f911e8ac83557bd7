//! Pixel-format negotiation and frame transport for remote rendering hosts.
//!
//! A host opens a session for one window, connects it to a receiver, then
//! repeatedly asks for a frame in some pixel format, fills it and hands it
//! back. The session decides the actual buffer layout from the configured
//! compression mode and ships frames to the receiver.
//!
//! # Crate Structure
//!
//! - [`format`]: pixel formats, compression modes and layout negotiation
//! - [`wire`]: the frame header and its stream codec
//! - [`transport`]: the transport contract and the TCP implementation
//! - [`session`]: per-window sessions over a transport (behind `session` feature)
//!
//! C hosts link `rrtrans-ffi` instead, which exposes the same session through
//! `RRTrans*` entrypoints.

/// Re-export format types.
pub mod format {
    pub use rrtrans_format::*;
}

/// Re-export wire types.
pub mod wire {
    pub use rrtrans_wire::*;
}

/// Re-export transport types.
pub mod transport {
    pub use rrtrans_transport::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use rrtrans_session::*;
}
