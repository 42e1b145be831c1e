//! Texture errors

use kanim_shared::ReadError;
use thiserror::Error;

use crate::header::PixelFormat;

/// Errors from reading a texture container or decoding one of its mips
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TexError {
    /// Wrong magic or truncated container/block data
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Pixels were requested from a format we have no decoder for
    #[error("unsupported pixel format {0:?} (only DXT5 blocks can be decoded)")]
    UnsupportedPixelFormat(PixelFormat),

    /// Requested mip level does not exist
    #[error("mip level {index} out of range ({count} levels)")]
    MipOutOfRange { index: usize, count: usize },

    /// Decoded raster did not match the image buffer size
    #[error("decoded raster does not fit a {width}x{height} image")]
    ImageBuffer { width: u32, height: u32 },
}
