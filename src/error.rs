//! Error types shared by the raster and vector components.
//!
//! Every operation in this crate fails terminally — there are no retries at
//! this layer. Messages combine a fixed contextual prefix (which file, which
//! operation) with whatever diagnostic text the underlying library produced,
//! so callers can surface them verbatim.

use crate::format::SourceFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    /// The bitmap could not be decoded (bad data, truncated file, missing
    /// path). The message includes the file's base name when decoding from
    /// disk.
    #[error("decode failed: {0}")]
    Decode(String),

    /// A non-raster format was declared for the raster decode path.
    #[error("unsupported raster format: {0}")]
    UnsupportedFormat(SourceFormat),

    #[error("scale failed: {0}")]
    Scale(String),

    #[error("PNG encode failed: {0}")]
    Encode(String),

    /// The drawing surface could not be allocated.
    #[error("canvas allocation failed: {0}")]
    Allocation(String),

    /// The vector document could not be parsed.
    #[error("vector parse failed: {0}")]
    Parse(String),

    /// The parsed vector document could not be composited onto the surface.
    #[error("vector render failed: {0}")]
    Render(String),

    /// An operation was attempted on an instance whose current dimensions
    /// make it meaningless (e.g. deriving an aspect ratio from a zero width).
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Result type for imaging operations.
pub type Result<T> = std::result::Result<T, ImagingError>;
