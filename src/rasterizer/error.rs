//! Error type for resource construction
//!
//! Drawing never fails: clipped or transparent pixels are skipped silently.
//! Only constructors and loaders report errors.

/// Error type for frames, bitmaps and binary assets
#[derive(Debug)]
pub enum RasterError {
    /// Buffer for a `width` x `height` resource could not be allocated
    Allocation { width: usize, height: usize },
    /// Zero or overflowing dimensions
    InvalidDimensions { width: usize, height: usize },
    /// Pixel buffer length does not match the dimensions
    BufferSize { expected: usize, actual: usize },
    /// Stored bitmap index outside the base band and not the sentinel
    InvalidIndex { index: u8, offset: usize },
    ImageError(image::ImageError),
    IoError(std::io::Error),
    /// Truncated or malformed binary asset
    FormatError(String),
}

impl From<std::io::Error> for RasterError {
    fn from(e: std::io::Error) -> Self {
        RasterError::IoError(e)
    }
}

impl From<image::ImageError> for RasterError {
    fn from(e: image::ImageError) -> Self {
        RasterError::ImageError(e)
    }
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::Allocation { width, height } => {
                write!(f, "Failed to allocate a {}x{} buffer", width, height)
            }
            RasterError::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions {}x{}", width, height)
            }
            RasterError::BufferSize { expected, actual } => {
                write!(f, "Buffer size mismatch: expected {} bytes, got {}", expected, actual)
            }
            RasterError::InvalidIndex { index, offset } => {
                write!(f, "Invalid bitmap index {} at offset {}", index, offset)
            }
            RasterError::ImageError(e) => write!(f, "Image error: {}", e),
            RasterError::IoError(e) => write!(f, "IO error: {}", e),
            RasterError::FormatError(msg) => write!(f, "Format error: {}", msg),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterError::ImageError(e) => Some(e),
            RasterError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// Allocate a buffer of `len` bytes set to `fill`, reporting failure
/// instead of aborting
pub(crate) fn alloc_buffer(
    len: usize,
    fill: u8,
    width: usize,
    height: usize,
) -> Result<Vec<u8>, RasterError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| RasterError::Allocation { width, height })?;
    buf.resize(len, fill);
    Ok(buf)
}
