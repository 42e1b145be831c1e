//! Structural read errors shared by all container readers

use thiserror::Error;

/// Failure while reading a container byte stream.
///
/// Every variant is fatal for the load that raised it: a single misaligned
/// read corrupts everything after it, so no partial result is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The leading tag does not name the expected container
    #[error("invalid magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: String, found: String },

    /// A read needed more bytes than the buffer has left
    #[error("read of {wanted} bytes at offset {offset} overruns buffer ({remaining} bytes left)")]
    OutOfBounds {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },

    /// A value handed to the bit-field packer is wider than its field
    #[error("value {value} does not fit in a {width}-bit field")]
    FieldOverflow { value: u32, width: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReadError::BadMagic {
            expected: "KTEX".into(),
            found: "BILD".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid magic: expected \"KTEX\", found \"BILD\""
        );

        let err = ReadError::OutOfBounds {
            offset: 12,
            wanted: 4,
            remaining: 2,
        };
        assert_eq!(
            err.to_string(),
            "read of 4 bytes at offset 12 overruns buffer (2 bytes left)"
        );
    }
}
