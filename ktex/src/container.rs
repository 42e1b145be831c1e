//! Texture container reader

use image::RgbaImage;
use kanim_shared::ByteCursor;
use serde::Serialize;

use crate::decode::decode_dxt5;
use crate::error::TexError;
use crate::header::{PixelFormat, TextureHeader};
use crate::{BLOCK_BYTES, KTEX_MAGIC, block_count};

/// One resolution level of the texture, still compressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MipLevel {
    pub width: u16,
    pub height: u16,
    pub pitch: u16,
    pub byte_length: u32,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl MipLevel {
    /// Decode this level to RGBA8 pixels (`width * height * 4` bytes)
    pub fn decode(&self, format: PixelFormat) -> Result<Vec<u8>, TexError> {
        match format {
            PixelFormat::Dxt5 => Ok(decode_dxt5(
                &self.data,
                u32::from(self.width),
                u32::from(self.height),
            )?),
            other => Err(TexError::UnsupportedPixelFormat(other)),
        }
    }
}

/// A parsed `KTEX` file.
///
/// Block data is copied out of the source buffer at load time; pixels are
/// only decoded when a mip is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextureContainer {
    pub header: TextureHeader,
    pub mips: Vec<MipLevel>,
}

impl TextureContainer {
    /// Parse a texture container from raw file bytes
    ///
    /// # Errors
    /// * `TexError::Read` - wrong magic, or the mip table / block data is truncated
    pub fn read(data: &[u8]) -> Result<Self, TexError> {
        let mut cursor = ByteCursor::new(data);
        cursor.expect_magic(KTEX_MAGIC)?;

        let header = TextureHeader::from_word(cursor.read_u32_le()?);

        // Descriptors first, then the blocks in the same order
        let mut mips = cursor.repeat(usize::from(header.mip_count), |c, _| {
            Ok::<_, TexError>(MipLevel {
                width: c.read_u16_le()?,
                height: c.read_u16_le()?,
                pitch: c.read_u16_le()?,
                byte_length: c.read_u32_le()?,
                data: Vec::new(),
            })
        })?;

        for mip in &mut mips {
            mip.data = cursor.read_bytes(mip.byte_length as usize)?.to_vec();

            let needed = block_count(u32::from(mip.width), u32::from(mip.height)) * BLOCK_BYTES;
            if header.pixel_format == PixelFormat::Dxt5 && mip.data.len() < needed {
                tracing::warn!(
                    "KTEX mip {}x{} holds {} bytes, blocks need {}",
                    mip.width,
                    mip.height,
                    mip.data.len(),
                    needed
                );
            }
        }

        if !cursor.at_end() {
            tracing::debug!("KTEX has {} trailing bytes", cursor.remaining());
        }

        tracing::debug!(
            "KTEX {:?} {:?}, {} mips",
            header.pixel_format,
            header.texture_type,
            mips.len()
        );

        Ok(Self { header, mips })
    }

    pub fn mip(&self, index: usize) -> Result<&MipLevel, TexError> {
        self.mips.get(index).ok_or(TexError::MipOutOfRange {
            index,
            count: self.mips.len(),
        })
    }

    /// Decode a mip to RGBA8 pixels
    pub fn mip_pixels(&self, index: usize) -> Result<Vec<u8>, TexError> {
        self.mip(index)?.decode(self.header.pixel_format)
    }

    /// Decode a mip into an image buffer
    pub fn mip_image(&self, index: usize) -> Result<RgbaImage, TexError> {
        let mip = self.mip(index)?;
        let (width, height) = (u32::from(mip.width), u32::from(mip.height));
        let pixels = mip.decode(self.header.pixel_format)?;
        RgbaImage::from_raw(width, height, pixels).ok_or(TexError::ImageBuffer { width, height })
    }
}
