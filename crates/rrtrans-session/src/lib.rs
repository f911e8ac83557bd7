//! Session and frame lifecycle management.
//!
//! This is the layer a rendering host drives. Open a session around one
//! transport, allocate frames in a requested pixel format, fill them, and
//! hand them back for transmission:
//!
//! ```no_run
//! use rrtrans_format::PixelFormat;
//! use rrtrans_session::{Config, Session, WindowId};
//! use rrtrans_transport::TcpTransport;
//!
//! # fn main() -> rrtrans_session::Result<()> {
//! let mut session = Session::open(WindowId(0x0040_0007), Config::default(), || {
//!     Ok(TcpTransport::new())
//! })?;
//! session.connect("127.0.0.1", 4242)?;
//!
//! let mut frame = session.allocate(640, 480, PixelFormat::Bgra, false)?;
//! frame.bits_mut().fill(0x80);
//! session.send(frame, false)?;
//! session.synchronize()?;
//! session.destroy()
//! # }
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod session;

pub use config::{Config, ConfigSource, WindowId, DEFAULT_QUALITY};
pub use error::{ErrorRecord, Result, SessionError};
pub use frame::Frame;
pub use session::Session;
