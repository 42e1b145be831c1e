//! KTEX: texture container reader and block decoder
//!
//! A `KTEX` file is a small header word followed by a table of mip levels
//! and then the raw block data of each level. The only pixel format we
//! decode is the DXT5-style interpolated-alpha block codec; every other
//! format can still be parsed and inspected, but asking for its pixels fails.
//!
//! # Container Layout
//!
//! ```text
//! 0x00: magic "KTEX"
//! 0x04: header word (u32 LE bit fields, least-significant first)
//!         platform:4 pixel_format:5 texture_type:4 mip_count:5 flags:2 fill:12
//! 0x08: mip_count x { width u16, height u16, pitch u16, byte_length u32 }
//! ....: mip_count x byte_length bytes of block data, same order
//! ```
//!
//! # Block Layout (16 bytes per 4x4 pixels)
//!
//! ```text
//! 0x00: alpha0 u8, alpha1 u8
//! 0x02: 16 x 3-bit alpha indices (48 bits LE)
//! 0x08: color0 u16 (RGB565), color1 u16 (RGB565)
//! 0x0C: 4 rows x four 2-bit color indices (LSB pair first)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ktex::TextureContainer;
//!
//! let data = std::fs::read("atlas-0.tex")?;
//! let tex = TextureContainer::read(&data)?;
//! let image = tex.mip_image(0)?;
//! image.save("atlas-0.png")?;
//! ```

mod container;
mod decode;
mod error;
mod header;

pub use container::{MipLevel, TextureContainer};
pub use decode::{alpha_table, color_table, decode_block, decode_dxt5, expand_565};
pub use error::TexError;
pub use header::{PixelFormat, Platform, TextureHeader, TextureType};

// =============================================================================
// Constants
// =============================================================================

/// Texture container magic
pub const KTEX_MAGIC: &[u8; 4] = b"KTEX";

/// Pixels along one edge of a compressed block
pub const BLOCK_DIM: u32 = 4;

/// Bytes per compressed 4x4 block
pub const BLOCK_BYTES: usize = 16;

/// Bytes per decoded pixel (RGBA8)
pub const BYTES_PER_PIXEL: usize = 4;

/// Number of 4x4 blocks needed to cover a `width` x `height` raster
pub fn block_count(width: u32, height: u32) -> usize {
    width.div_ceil(BLOCK_DIM) as usize * height.div_ceil(BLOCK_DIM) as usize
}
