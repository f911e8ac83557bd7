use bytes::BytesMut;
use rrtrans_format::{row_pitch, FrameFlags};
use rrtrans_wire::FrameHeader;

/// Shape of a buffer requested from a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRequest {
    pub width: u32,
    pub height: u32,
    pub pixel_size: u8,
    pub flags: FrameFlags,
    pub stereo: bool,
}

impl BufferRequest {
    /// Row pitch in bytes for this request.
    pub fn pitch(&self) -> usize {
        row_pitch(self.width, self.pixel_size)
    }

    /// Bytes per eye.
    pub fn image_len(&self) -> usize {
        self.pitch() * self.height as usize
    }
}

/// Transport-owned pixel storage for one frame.
///
/// The right-eye image exists only for stereo frames. Pixel storage is
/// heap-allocated and does not move while the buffer is held, so raw pointers
/// handed to a host remain valid until the buffer is transmitted or dropped.
#[derive(Debug)]
pub struct FrameBuffer {
    header: FrameHeader,
    bits: BytesMut,
    rbits: Option<BytesMut>,
}

impl FrameBuffer {
    /// Allocate zeroed storage for `request`.
    pub fn new(request: &BufferRequest) -> Self {
        let mut buffer = Self {
            header: FrameHeader::default(),
            bits: BytesMut::new(),
            rbits: None,
        };
        buffer.reshape(request);
        buffer
    }

    /// Resize storage for `request`, reusing the existing allocation when it
    /// is large enough, and reset the geometry fields of the header.
    pub fn reshape(&mut self, request: &BufferRequest) {
        let len = request.image_len();
        self.bits.clear();
        self.bits.resize(len, 0);
        if request.stereo {
            let rbits = self.rbits.get_or_insert_with(BytesMut::new);
            rbits.clear();
            rbits.resize(len, 0);
        } else {
            self.rbits = None;
        }

        self.header = FrameHeader {
            flags: request.flags,
            width: request.width,
            height: request.height,
            pitch: request.pitch() as u32,
            pixel_size: request.pixel_size,
            ..FrameHeader::default()
        };
    }

    /// True if this buffer already has the geometry of `request`.
    pub fn matches(&self, request: &BufferRequest) -> bool {
        self.header.width == request.width
            && self.header.height == request.height
            && self.header.pixel_size == request.pixel_size
            && self.rbits.is_some() == request.stereo
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut FrameHeader {
        &mut self.header
    }

    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn pitch(&self) -> usize {
        self.header.pitch as usize
    }

    pub fn pixel_size(&self) -> u8 {
        self.header.pixel_size
    }

    pub fn flags(&self) -> FrameFlags {
        self.header.flags
    }

    pub fn is_stereo(&self) -> bool {
        self.rbits.is_some()
    }

    /// Primary (left-eye) pixel rows.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn bits_mut(&mut self) -> &mut [u8] {
        &mut self.bits
    }

    /// Right-eye pixel rows, present for stereo frames.
    pub fn right_bits(&self) -> Option<&[u8]> {
        self.rbits.as_deref()
    }

    pub fn right_bits_mut(&mut self) -> Option<&mut [u8]> {
        self.rbits.as_deref_mut()
    }
}
