//! Error types for build and animation loading

use kanim_shared::ReadError;
use ktex::TexError;
use thiserror::Error;

/// Errors from reading a build or animation bank, or extracting atlas pixels
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KanimError {
    /// Wrong magic or truncated container
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Atlas texture could not be decoded
    #[error(transparent)]
    Texture(#[from] TexError),

    /// Vertices of one frame point at different atlas pages
    #[error(
        "inconsistent depth in symbol {symbol} frame {frame}: {first} vs {found} (tolerance {tolerance})",
        tolerance = crate::DEPTH_TOLERANCE
    )]
    InconsistentDepth {
        symbol: u32,
        frame: u32,
        first: f32,
        found: f32,
    },

    /// Frame depths span more atlas pages than the build names
    #[error("build needs {required} atlases but declares {available}")]
    AtlasLimit { required: usize, available: usize },

    /// No symbol frame with this number
    #[error("symbol {symbol} has no frame {frame}")]
    UnknownFrame { symbol: u32, frame: u32 },

    /// Frame has no triangles, so nothing to cut out of an atlas
    #[error("symbol {symbol} frame {frame} has no geometry")]
    NoGeometry { symbol: u32, frame: u32 },
}
