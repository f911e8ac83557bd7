use bitflags::bitflags;

bitflags! {
    /// Layout flags carried by every frame buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameFlags: u8 {
        /// Rows are stored bottom row first.
        const BOTTOM_UP = 0x01;
        /// Color components are stored blue first.
        const BGR = 0x02;
        /// The alpha/padding byte precedes the color components.
        const ALPHA_FIRST = 0x04;
    }
}

impl FrameFlags {
    /// True when the BGR byte-order flag is set.
    pub fn is_bgr(self) -> bool {
        self.contains(Self::BGR)
    }

    /// True when the alpha-first flag is set.
    pub fn is_alpha_first(self) -> bool {
        self.contains(Self::ALPHA_FIRST)
    }
}
