use crate::pixel::BitDepth;

/// Errors from BMP decoding, encoding, and pixel operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BitmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("{operation} is not defined for {depth:?} images")]
    DepthMismatch {
        operation: &'static str,
        depth: BitDepth,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Coarse classification of a [`BitmapError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file could not be opened, created, read, or written.
    Io,
    /// The byte stream is not a supported uncompressed 8/24-bit BMP.
    Format,
    /// A pixel buffer could not be allocated.
    Allocation,
    /// An operation argument was rejected, or a caller-supplied [`crate::Limits`]
    /// bound refused the image.
    InvalidParameter,
}

impl BitmapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::UnrecognizedFormat
            | Self::InvalidHeader(_)
            | Self::UnsupportedVariant(_)
            | Self::UnexpectedEof
            | Self::DimensionsTooLarge { .. } => ErrorKind::Format,
            Self::AllocationFailed { .. } => ErrorKind::Allocation,
            Self::LimitExceeded(_)
            | Self::InvalidKernel(_)
            | Self::DepthMismatch { .. }
            | Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
        }
    }
}
