use rrtrans_format::{lookup, negotiate, FormatError, PixelFormat};
use rrtrans_transport::{BufferRequest, Operation, Transport, TransportError};
use tracing::{debug, info};

use crate::config::{ConfigSource, WindowId};
use crate::error::{Result, SessionError};
use crate::frame::Frame;

/// One transport connection bound to one host window.
///
/// A session is driven from one thread at a time. Frames are moved into
/// [`send`](Session::send), so a frame cannot be used after it is handed back.
pub struct Session<T, C> {
    transport: T,
    window: WindowId,
    config: C,
}

impl<T: Transport, C: ConfigSource> Session<T, C> {
    /// Construct the transport and bind it to `window` and `config`.
    pub fn open<F>(window: WindowId, config: C, construct: F) -> Result<Self>
    where
        F: FnOnce() -> std::result::Result<T, TransportError>,
    {
        let transport = construct().map_err(SessionError::transport(Operation::Construct))?;
        info!(%window, "session opened");
        Ok(Self {
            transport,
            window,
            config,
        })
    }

    /// Connect to a receiver. May block until the transport is ready for frames.
    pub fn connect(&mut self, address: &str, port: u16) -> Result<()> {
        debug!(address, port, "connecting session");
        self.transport
            .connect(address, port)
            .map_err(SessionError::transport(Operation::Connect))
    }

    /// Allocate a frame for `width` x `height` pixels in the requested format.
    ///
    /// The returned frame's format may differ from `format` when the
    /// configured compression dictates its own layout.
    pub fn allocate(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
        stereo: bool,
    ) -> Result<Frame> {
        let config = self.config.snapshot();
        let negotiated = negotiate(config.compression, format)?;

        let mut buffer = self
            .transport
            .acquire_buffer(BufferRequest {
                width,
                height,
                pixel_size: negotiated.pixel_size,
                flags: negotiated.flags,
                stereo,
            })
            .map_err(SessionError::transport(Operation::AcquireBuffer))?;
        buffer.header_mut().compression = negotiated.compression;

        // The transport has the final say on layout.
        let flags = buffer.flags();
        let pixel_size = buffer.pixel_size();
        let actual = lookup(flags.is_bgr(), flags.is_alpha_first(), pixel_size).ok_or(
            FormatError::NoMatchingFormat {
                bgr: flags.is_bgr(),
                alpha_first: flags.is_alpha_first(),
                pixel_size,
            },
        )?;

        debug!(
            width,
            height,
            requested = %format,
            format = %actual,
            stereo,
            "allocated frame"
        );
        Ok(Frame::new(actual, buffer))
    }

    /// Transmit a filled frame.
    ///
    /// Quality, subsampling and the window id are stamped now rather than at
    /// allocation. With `sync`, blocks until the transport has dispatched it.
    pub fn send(&mut self, frame: Frame, sync: bool) -> Result<()> {
        let config = self.config.snapshot();
        let mut buffer = frame.into_buffer();
        let header = buffer.header_mut();
        header.quality = config.quality;
        header.subsampling = config.subsampling;
        header.window_id = self.window.0;

        self.transport
            .transmit(buffer, sync)
            .map_err(SessionError::transport(Operation::Transmit))
    }

    /// Non-blocking: true if another allocate/send cycle would not block.
    pub fn ready(&mut self) -> Result<bool> {
        self.transport
            .poll_ready()
            .map_err(SessionError::transport(Operation::PollReady))
    }

    /// Block until previously sent frames have been dispatched.
    pub fn synchronize(&mut self) -> Result<()> {
        self.transport
            .block_until_synced()
            .map_err(SessionError::transport(Operation::Synchronize))
    }

    /// Release the transport while keeping the session value alive.
    pub fn release(&mut self) -> Result<()> {
        self.transport
            .release()
            .map_err(SessionError::transport(Operation::Release))?;
        info!(window = %self.window, "session released");
        Ok(())
    }

    /// Release the transport and consume the session.
    pub fn destroy(mut self) -> Result<()> {
        self.release()
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
