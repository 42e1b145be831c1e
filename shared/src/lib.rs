//! Shared primitives for the kanim container readers.
//!
//! Every container format handled by the workspace (`KTEX` textures, `BILD`
//! atlas builds and `ANIM` animation banks) is a little-endian stream read
//! strictly front to back. This crate holds the pieces all three readers
//! share:
//!
//! - [`ByteCursor`]: bounds-checked sequential reads over a borrowed buffer
//! - [`unpack_bit_fields`] / [`pack_bit_fields`]: header word bit fields
//! - [`HashTable`]: the per-container hash -> name dictionary
//! - [`ReadError`]: the structural failures every reader can hit

pub mod bits;
pub mod cursor;
pub mod error;
pub mod fs;
pub mod hash_table;
pub mod ids;

pub use bits::{pack_bit_fields, unpack_bit_fields};
pub use cursor::ByteCursor;
pub use error::ReadError;
pub use hash_table::HashTable;

/// Length of the magic tag that opens every container
pub const MAGIC_LEN: usize = 4;
