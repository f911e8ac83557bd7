use rrtrans_format::{Compression, FrameFlags, PixelFormat};
use rrtrans_transport::FrameBuffer;

/// A frame allocated by a session and owned by the host until it is sent.
///
/// Pixel storage belongs to the transport; the frame only carries it between
/// `Session::allocate` and `Session::send`. Dropping a frame abandons it.
#[derive(Debug)]
pub struct Frame {
    format: PixelFormat,
    buffer: FrameBuffer,
}

impl Frame {
    pub(crate) fn new(format: PixelFormat, buffer: FrameBuffer) -> Self {
        Self { format, buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Bytes per row, including padding.
    pub fn pitch(&self) -> usize {
        self.buffer.pitch()
    }

    /// Canonical format of the pixel rows.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixel_size(&self) -> u8 {
        self.buffer.pixel_size()
    }

    pub fn flags(&self) -> FrameFlags {
        self.buffer.flags()
    }

    /// Compression mode negotiated at allocation.
    pub fn compression(&self) -> Compression {
        self.buffer.header().compression
    }

    pub fn is_stereo(&self) -> bool {
        self.buffer.is_stereo()
    }

    pub fn bits(&self) -> &[u8] {
        self.buffer.bits()
    }

    pub fn bits_mut(&mut self) -> &mut [u8] {
        self.buffer.bits_mut()
    }

    /// Right-eye rows for stereo frames.
    pub fn right_bits(&self) -> Option<&[u8]> {
        self.buffer.right_bits()
    }

    pub fn right_bits_mut(&mut self) -> Option<&mut [u8]> {
        self.buffer.right_bits_mut()
    }

    /// The transport buffer backing this frame.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub(crate) fn into_buffer(self) -> FrameBuffer {
        self.buffer
    }
}
