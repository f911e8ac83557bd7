/// Errors that can occur while resolving pixel formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The raw format identifier is outside the canonical table.
    #[error("unknown pixel format identifier {0}")]
    UnknownFormat(i32),

    /// The negotiated layout has no row in the format table.
    #[error(
        "no pixel format matches layout (bgr={bgr}, alpha_first={alpha_first}, pixel_size={pixel_size})"
    )]
    NoMatchingFormat {
        bgr: bool,
        alpha_first: bool,
        pixel_size: u8,
    },
}

pub type Result<T> = std::result::Result<T, FormatError>;
