//! Per-container hash -> name dictionary
//!
//! Build and animation containers end with a table recovering the
//! strings behind the u32 hashes used everywhere else in the file. The
//! hashing scheme itself is opaque to us; we only ever look hashes up.

use std::borrow::Cow;

use hashbrown::HashMap;
use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::ReadError;

/// Mapping from u32 hash to its human-readable name.
///
/// Several hashes may share a name. A hash with no entry is legal; callers
/// fall back to the decimal hash via [`HashTable::name_or_hash`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HashTable {
    names: HashMap<u32, String>,
}

impl HashTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `u32 count` followed by `count` × (`u32 hash`, string).
    ///
    /// A hash that appears twice keeps the later name.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ReadError> {
        let count = cursor.read_u32_le()? as usize;
        let mut table = Self::new();
        for _ in 0..count {
            let hash = cursor.read_u32_le()?;
            let name = cursor.read_string()?;
            table.insert(hash, name);
        }
        Ok(table)
    }

    pub fn insert(&mut self, hash: u32, name: impl Into<String>) {
        self.names.insert(hash, name.into());
    }

    pub fn get(&self, hash: u32) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    /// Name for `hash`, or the hash in decimal when the table has no entry
    pub fn name_or_hash(&self, hash: u32) -> Cow<'_, str> {
        match self.get(hash) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(hash.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(entries: &[(u32, &str)]) -> Vec<u8> {
        let mut data = (entries.len() as u32).to_le_bytes().to_vec();
        for (hash, name) in entries {
            data.extend_from_slice(&hash.to_le_bytes());
            data.extend_from_slice(&(name.len() as u32).to_le_bytes());
            data.extend_from_slice(name.as_bytes());
        }
        data
    }

    #[test]
    fn test_read_table() {
        let data = encode(&[(1, "head"), (2, "arm")]);
        let mut cursor = ByteCursor::new(&data);
        let table = HashTable::read(&mut cursor).unwrap();

        assert!(cursor.at_end());
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some("head"));
        assert_eq!(table.get(2), Some("arm"));
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn test_duplicate_hash_last_wins() {
        let data = encode(&[(7, "old"), (7, "new")]);
        let table = HashTable::read(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(7), Some("new"));
    }

    #[test]
    fn test_name_or_hash() {
        let mut table = HashTable::new();
        table.insert(10, "torso");
        assert_eq!(table.name_or_hash(10), "torso");
        assert_eq!(table.name_or_hash(4_000_000_000), "4000000000");
    }

    #[test]
    fn test_truncated_table() {
        let mut data = encode(&[(1, "head"), (2, "arm")]);
        data.truncate(data.len() - 1);
        assert!(matches!(
            HashTable::read(&mut ByteCursor::new(&data)),
            Err(ReadError::OutOfBounds { .. })
        ));
    }
}
