//! MD5-based block hashing.

use md5::{Digest, Md5};

use crate::block::BlockDigest;

/// A hasher that computes MD5 digests.
#[derive(Debug, Clone, Default)]
pub struct Md5Hasher {
    state: Md5,
}

impl Md5Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self { state: Md5::new() }
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Consumes the hasher and returns the digest.
    pub fn finalize(self) -> BlockDigest {
        BlockDigest::new(self.state.finalize().into())
    }

    /// Convenience method to hash data in one shot.
    pub fn hash(data: &[u8]) -> BlockDigest {
        BlockDigest::new(Md5::digest(data).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_empty() {
        assert_eq!(
            Md5Hasher::hash(b"").to_hex(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_incremental_hashing() {
        let mut hasher = Md5Hasher::new();
        hasher.update(b"AAAA");
        hasher.update(b"BBBBC");
        let digest = hasher.finalize();

        assert_eq!(digest, Md5Hasher::hash(b"AAAABBBBC"));
        assert_eq!(digest.to_hex(), "dacae6b6cfddd293b2713ac913171bd8");
    }
}
