//! Block digest type.

use std::fmt;

/// The MD5 digest of one block, or of the concatenated block digests.
///
/// MD5 is used for compatibility with the stores that report these values,
/// not for integrity against an adversary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockDigest([u8; 16]);

impl BlockDigest {
    /// The size of the digest in bytes.
    pub const SIZE: usize = 16;

    /// Creates a digest from a byte array.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a digest from a slice.
    ///
    /// Returns `None` if the slice is not exactly 16 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 16]>::try_from(slice).ok().map(Self)
    }

    /// Returns the digest as a byte array.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a digest from 32 hex characters, either case.
    ///
    /// Returns `None` if the string is not valid hex or not exactly 32
    /// characters.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(hex_str, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl AsRef<[u8]> for BlockDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 16]> for BlockDigest {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for BlockDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice() {
        let bytes = vec![7u8; 16];
        let digest = BlockDigest::from_slice(&bytes).unwrap();
        assert_eq!(digest.as_bytes().as_ref(), bytes.as_slice());

        // Wrong size
        assert!(BlockDigest::from_slice(&[0u8; 15]).is_none());
        assert!(BlockDigest::from_slice(&[0u8; 32]).is_none());
    }

    #[test]
    fn test_hex_is_lowercase() {
        let digest = BlockDigest::new([0xABu8; 16]);
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
        assert_eq!(hex, digest.to_string());
    }

    #[test]
    fn test_from_hex() {
        let digest = BlockDigest::from_hex("d41d8cd98f00b204e9800998ecf8427e").unwrap();
        assert_eq!(digest.as_bytes()[0], 0xd4);
        assert_eq!(
            BlockDigest::from_hex("D41D8CD98F00B204E9800998ECF8427E"),
            Some(digest)
        );

        assert!(BlockDigest::from_hex("d41d8cd9").is_none());
        assert!(BlockDigest::from_hex("z41d8cd98f00b204e9800998ecf8427e").is_none());
    }
}
