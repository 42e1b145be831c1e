//! Packed header words
//!
//! Container headers pack several small fields into one little-endian u32.
//! Fields are laid out least-significant first: the first width names the
//! lowest bits, the next width the bits directly above it, and so on.
//!
//! ```text
//! widths [4, 5, 4, 5, 2, 12]
//!
//! bit 31                                                  bit 0
//! | fill:12 | f4:2 | f3:5 | f2:4 | f1:5 | f0:4 |
//! ```

use crate::error::ReadError;

fn mask(width: u32) -> u64 {
    (1u64 << width) - 1
}

/// Split `word` into fields of the given widths, least-significant first.
///
/// Widths must sum to at most 32.
pub fn unpack_bit_fields(word: u32, widths: &[u32]) -> Vec<u32> {
    debug_assert!(widths.iter().sum::<u32>() <= 32);

    let mut shift = 0u32;
    widths
        .iter()
        .map(|&width| {
            let value = (u64::from(word) >> shift) & mask(width);
            shift += width;
            value as u32
        })
        .collect()
}

/// Inverse of [`unpack_bit_fields`]: place each value at its field offset.
///
/// Fails with [`ReadError::FieldOverflow`] if a value has bits set outside
/// its field width.
pub fn pack_bit_fields(values: &[u32], widths: &[u32]) -> Result<u32, ReadError> {
    debug_assert_eq!(values.len(), widths.len());
    debug_assert!(widths.iter().sum::<u32>() <= 32);

    let mut word = 0u64;
    let mut shift = 0u32;
    for (&value, &width) in values.iter().zip(widths) {
        if u64::from(value) & !mask(width) != 0 {
            return Err(ReadError::FieldOverflow { value, width });
        }
        word |= u64::from(value) << shift;
        shift += width;
    }
    Ok(word as u32)
}
