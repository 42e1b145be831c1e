//! Texture header word

use kanim_shared::{ReadError, pack_bit_fields, unpack_bit_fields};
use serde::Serialize;

/// Pixel encoding of every mip in the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelFormat {
    Dxt1,
    Dxt3,
    Dxt5,
    Rgba,
    Rgb,
    A8,
    Unknown(u8),
}

impl PixelFormat {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Dxt1,
            1 => Self::Dxt3,
            2 => Self::Dxt5,
            4 => Self::Rgba,
            5 => Self::Rgb,
            8 => Self::A8,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Dxt1 => 0,
            Self::Dxt3 => 1,
            Self::Dxt5 => 2,
            Self::Rgba => 4,
            Self::Rgb => 5,
            Self::A8 => 8,
            Self::Unknown(code) => code,
        }
    }
}

/// Platform the texture was cooked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Default,
    Ps3,
    Xbox360,
    Pc,
    Unknown(u8),
}

impl Platform {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Default,
            10 => Self::Ps3,
            11 => Self::Xbox360,
            12 => Self::Pc,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::Ps3 => 10,
            Self::Xbox360 => 11,
            Self::Pc => 12,
            Self::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextureType {
    OneD,
    TwoD,
    ThreeD,
    Cube,
    Unknown(u8),
}

impl TextureType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::OneD,
            1 => Self::TwoD,
            2 => Self::ThreeD,
            3 => Self::Cube,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::OneD => 0,
            Self::TwoD => 1,
            Self::ThreeD => 2,
            Self::Cube => 3,
            Self::Unknown(code) => code,
        }
    }
}

/// Decoded header word.
///
/// The remaining 12 bits above `flags` carry no known meaning but are kept
/// so the word can be rebuilt exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextureHeader {
    pub platform: Platform,
    pub pixel_format: PixelFormat,
    pub texture_type: TextureType,
    pub mip_count: u8,
    pub flags: u8,
    pub fill: u16,
}

impl TextureHeader {
    /// Field widths, least-significant first:
    /// platform, pixel_format, texture_type, mip_count, flags, fill
    pub const FIELD_WIDTHS: [u32; 6] = [4, 5, 4, 5, 2, 12];

    pub fn from_word(word: u32) -> Self {
        let fields = unpack_bit_fields(word, &Self::FIELD_WIDTHS);
        Self {
            platform: Platform::from_code(fields[0] as u8),
            pixel_format: PixelFormat::from_code(fields[1] as u8),
            texture_type: TextureType::from_code(fields[2] as u8),
            mip_count: fields[3] as u8,
            flags: fields[4] as u8,
            fill: fields[5] as u16,
        }
    }

    pub fn to_word(&self) -> Result<u32, ReadError> {
        pack_bit_fields(
            &[
                u32::from(self.platform.code()),
                u32::from(self.pixel_format.code()),
                u32::from(self.texture_type.code()),
                u32::from(self.mip_count),
                u32::from(self.flags),
                u32::from(self.fill),
            ],
            &Self::FIELD_WIDTHS,
        )
    }
}
