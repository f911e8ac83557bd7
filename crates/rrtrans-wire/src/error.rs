/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame header contains an invalid magic number.
    #[error("invalid frame magic (expected 0x5252 \"RR\")")]
    InvalidMagic,

    /// The header was written by an incompatible protocol version.
    #[error("unsupported wire version {0}")]
    UnsupportedVersion(u8),

    /// A header field holds a value outside its domain.
    #[error("invalid header field {field}: {value}")]
    InvalidField { field: &'static str, value: u64 },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The payload length disagrees with the header geometry.
    #[error("payload length {actual} does not match pitch * height = {expected}")]
    PayloadMismatch { expected: usize, actual: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;
