use std::net::SocketAddr;

use rrtrans_wire::WireError;

/// Errors that can occur in frame transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The receiver address could not be resolved.
    #[error("failed to resolve {host}:{port}: {source}")]
    Resolve {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    /// Failed to connect to the receiver.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// A frame was transmitted before `connect`.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called on a live connection.
    #[error("already connected to {0}")]
    AlreadyConnected(SocketAddr),

    /// Requested frame geometry is zero or exceeds the configured maximum.
    #[error("invalid frame dimensions {width}x{height} (max {max})")]
    InvalidDimensions { width: u32, height: u32, max: u32 },

    /// Pixel stride other than 3 or 4 bytes.
    #[error("invalid pixel size {0} (expected 3 or 4)")]
    InvalidPixelSize(u8),

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding failed.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// The sender thread stopped after a failure.
    #[error("frame sender failed: {0}")]
    SenderFailed(String),

    /// Failure reported by a third-party transport.
    #[error("{0}")]
    Custom(String),

    /// The transport has been released.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;
