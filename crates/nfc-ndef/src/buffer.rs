use zeroize::Zeroize as _;

use crate::{NdefError, Result};

/// Owned, length-tracked byte storage used for record type, id and payload fields
///
/// Zero length is a valid value and is distinct from an absent field, which is
/// modelled as `Option<ByteBuffer>` by the owner
#[derive(
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    derive_more::Deref,
    derive_more::From,
    derive_more::Into,
)]
#[deref(forward)]
pub struct ByteBuffer(Vec<u8>);

uniffi::custom_newtype!(ByteBuffer, Vec<u8>);

impl ByteBuffer {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Allocate `length` zeroed bytes
    pub fn create(length: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(length)
            .map_err(|_| NdefError::AllocationFailure { length: length as u64 })?;

        data.resize(length, 0);
        Ok(Self(data))
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Replace the contents with a copy of `bytes`
    ///
    /// The previous contents are zeroed first, an empty `bytes` keeps the allocation
    pub fn set(&mut self, bytes: &[u8]) {
        self.0.zeroize();

        if bytes.is_empty() {
            return;
        }

        self.0.extend_from_slice(bytes);
    }

    pub fn get(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Zero the contents and release the storage
    pub fn clear(&mut self) {
        self.0.zeroize();
        self.0 = Vec::new();
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Lossy UTF-8 view, used for type names and ids in messages and logs
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).to_string()
    }
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ByteBuffer({})", hex::encode(&self.0))
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for ByteBuffer {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from_slice(bytes)
    }
}

impl From<&str> for ByteBuffer {
    fn from(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }
}

impl PartialEq<[u8]> for ByteBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteBuffer {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.0 == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_is_zeroed() {
        let buffer = ByteBuffer::create(8).unwrap();
        assert_eq!(buffer.len(), 8);
        assert!(buffer.iter().all(|byte| *byte == 0));

        let empty = ByteBuffer::create(0).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn set_replaces_contents() {
        let mut buffer = ByteBuffer::from_slice(b"hello world");
        buffer.set(b"bye");
        assert_eq!(buffer.get(), b"bye");

        buffer.set(&[]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn empty_set_keeps_allocation() {
        let mut buffer = ByteBuffer::from_slice(&[1, 2, 3, 4]);
        let capacity = buffer.0.capacity();

        buffer.set(&[]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.0.capacity(), capacity);
    }

    #[test]
    fn clear_releases_storage() {
        let mut buffer = ByteBuffer::from_slice(&[0xAA; 32]);
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.0.capacity(), 0);
    }

    #[test]
    fn huge_allocation_fails_gracefully() {
        let result = ByteBuffer::create(usize::MAX);
        assert!(matches!(result, Err(NdefError::AllocationFailure { .. })));
    }

    #[test]
    fn debug_is_hex() {
        let buffer = ByteBuffer::from(&[0xde, 0xad]);
        assert_eq!(format!("{buffer:?}"), "ByteBuffer(dead)");
    }
}
