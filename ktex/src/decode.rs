//! DXT5 block decoder
//!
//! This module turns interpolated-alpha compressed blocks into straight
//! (non-premultiplied) RGBA8 pixels. It is a pure codec: the container reader
//! supplies the block bytes and the mip dimensions.

use kanim_shared::{ByteCursor, ReadError};

use crate::{BLOCK_DIM, BYTES_PER_PIXEL};

/// Expand an RGB565 value to 8-bit channels by replicating the high bits
pub fn expand_565(color: u16) -> [u8; 3] {
    let b = color & 0x1F;
    let g = (color >> 5) & 0x3F;
    let r = (color >> 11) & 0x1F;
    [
        ((r << 3) | (r >> 2)) as u8,
        ((g << 2) | (g >> 4)) as u8,
        ((b << 3) | (b >> 2)) as u8,
    ]
}

/// Build the 8-entry alpha palette for a block.
///
/// With `a0 <= a1` the block uses 4 interpolated steps plus explicit 0 and
/// 255; otherwise 6 interpolated steps.
pub fn alpha_table(a0: u8, a1: u8) -> [u8; 8] {
    let (lo, hi) = (u32::from(a0), u32::from(a1));
    let mut table = [a0, a1, 0, 0, 0, 0, 0, 0];

    if a0 <= a1 {
        for i in 1..5u32 {
            table[1 + i as usize] = (((5 - i) * lo + i * hi) / 5) as u8;
        }
        table[6] = 0;
        table[7] = 255;
    } else {
        for i in 1..7u32 {
            table[1 + i as usize] = (((7 - i) * lo + i * hi) / 7) as u8;
        }
    }

    table
}

/// Build the 4-entry color palette for a block.
///
/// Always the four-color mode: both thirds are interpolated regardless of
/// endpoint order.
pub fn color_table(c0: u16, c1: u16) -> [[u8; 3]; 4] {
    let e0 = expand_565(c0);
    let e1 = expand_565(c1);
    let mix = |w0: u16, w1: u16| -> [u8; 3] {
        std::array::from_fn(|ch| {
            ((w0 * u16::from(e0[ch]) + w1 * u16::from(e1[ch])) / (w0 + w1)) as u8
        })
    };
    [e0, e1, mix(2, 1), mix(1, 2)]
}

/// Decode one 16-byte block into 16 RGBA pixels in row-major order
pub fn decode_block(cursor: &mut ByteCursor<'_>) -> Result<[[u8; 4]; 16], ReadError> {
    // Alpha
    let a0 = cursor.read_u8()?;
    let a1 = cursor.read_u8()?;
    let alphas = alpha_table(a0, a1);

    let mut alpha_bits = [0u8; 8];
    alpha_bits[..6].copy_from_slice(cursor.read_bytes(6)?);
    let alpha_bits = u64::from_le_bytes(alpha_bits);

    // Color
    let c0 = cursor.read_u16_le()?;
    let c1 = cursor.read_u16_le()?;
    let colors = color_table(c0, c1);
    let rows = cursor.read_bytes(4)?;

    let mut pixels = [[0u8; 4]; 16];
    for (i, pixel) in pixels.iter_mut().enumerate() {
        let alpha_index = ((alpha_bits >> (3 * i)) & 0x7) as usize;
        let color_index = ((rows[i / 4] >> (2 * (i % 4))) & 0x3) as usize;
        let [r, g, b] = colors[color_index];
        *pixel = [r, g, b, alphas[alpha_index]];
    }

    Ok(pixels)
}

/// Decode a whole DXT5 mip into a `width * height * 4` RGBA8 buffer.
///
/// Blocks are read in row-major block order. Pixels of edge blocks that fall
/// outside the raster are dropped. Running out of block data fails with
/// [`ReadError::OutOfBounds`].
pub fn decode_dxt5(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ReadError> {
    let (w, h) = (width as usize, height as usize);
    let mut out = vec![0u8; w * h * BYTES_PER_PIXEL];
    let mut cursor = ByteCursor::new(data);
    let dim = BLOCK_DIM as usize;

    for block_y in (0..h).step_by(dim) {
        for block_x in (0..w).step_by(dim) {
            let pixels = decode_block(&mut cursor)?;

            for (i, pixel) in pixels.iter().enumerate() {
                let px = block_x + i % dim;
                let py = block_y + i / dim;
                if px >= w || py >= h {
                    continue;
                }
                let offset = (py * w + px) * BYTES_PER_PIXEL;
                out[offset..offset + BYTES_PER_PIXEL].copy_from_slice(pixel);
            }
        }
    }

    if !cursor.at_end() {
        tracing::debug!(
            "DXT5 mip {}x{} left {} trailing bytes",
            width,
            height,
            cursor.remaining()
        );
    }

    Ok(out)
}
