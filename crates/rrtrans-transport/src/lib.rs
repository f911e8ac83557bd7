//! Frame transport contract and reference implementation.
//!
//! The session layer never talks to a socket directly. It drives a
//! [`Transport`], which owns all pixel storage and decides how frames reach
//! the receiver:
//! - [`Transport`] — the collaborator contract
//! - [`FrameBuffer`] — transport-owned pixel storage plus per-frame header
//! - [`TcpTransport`] — reference transport streaming uncompressed frames over TCP

pub mod buffer;
pub mod config;
pub mod error;
pub mod tcp;
pub mod traits;

pub use buffer::{BufferRequest, FrameBuffer};
pub use config::TransportConfig;
pub use error::{Result, TransportError};
pub use tcp::TcpTransport;
pub use traits::{Operation, Transport};
