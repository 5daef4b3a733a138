//! Composite fingerprint and the aggregation step that produces it.

use std::fmt;
use std::str::FromStr;

use crate::block::BlockDigest;
use crate::error::EtagError;
use crate::hash::Md5Hasher;

/// The digest of all block digests, tagged with the number of blocks.
///
/// Renders as `<lowercase hex digest>-<block count>`, the form chunked stores
/// report for objects uploaded in parts.
///
/// # Example
///
/// ```
/// use etagrs::CompositeFingerprint;
///
/// let fp: CompositeFingerprint = "f066924e6930a631727fc89361c46cdc-3".parse()?;
/// assert_eq!(fp.blocks(), 3);
/// assert_eq!(fp.to_string(), "f066924e6930a631727fc89361c46cdc-3");
/// # Ok::<(), etagrs::EtagError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeFingerprint {
    digest: BlockDigest,
    blocks: u64,
}

impl CompositeFingerprint {
    /// Creates a fingerprint from its parts.
    pub const fn new(digest: BlockDigest, blocks: u64) -> Self {
        Self { digest, blocks }
    }

    /// Returns the digest over the concatenated block digests.
    pub fn digest(&self) -> BlockDigest {
        self.digest
    }

    /// Returns the number of blocks hashed.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }
}

impl fmt::Display for CompositeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.digest, self.blocks)
    }
}

impl FromStr for CompositeFingerprint {
    type Err = EtagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| EtagError::MalformedEtag {
            value: s.to_string(),
            reason,
        };

        let (hex, count) = s
            .rsplit_once('-')
            .ok_or_else(|| malformed("missing block count"))?;
        let digest = BlockDigest::from_hex(hex).ok_or_else(|| malformed("digest is not 32 hex digits"))?;
        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("block count is not a decimal number"));
        }
        let blocks = count
            .parse()
            .map_err(|_| malformed("block count out of range"))?;

        Ok(Self { digest, blocks })
    }
}

/// Incrementally aggregates block digests into a [`CompositeFingerprint`].
///
/// Each pushed digest is fed straight into the outer MD5 state, which gives
/// the same result as hashing the concatenation of all digests while holding
/// none of them.
///
/// # Example
///
/// ```
/// use etagrs::Composer;
///
/// let composer = Composer::new();
/// assert_eq!(
///     composer.finish().to_string(),
///     "d41d8cd98f00b204e9800998ecf8427e-0"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Composer {
    hasher: Md5Hasher,
    blocks: u64,
}

impl Composer {
    /// Creates an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the next block digest, in source order.
    pub fn push(&mut self, digest: &BlockDigest) {
        self.hasher.update(digest.as_bytes());
        self.blocks += 1;
    }

    /// Returns the number of digests pushed so far.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    /// Computes the composite fingerprint.
    pub fn finish(self) -> CompositeFingerprint {
        CompositeFingerprint {
            digest: self.hasher.finalize(),
            blocks: self.blocks,
        }
    }
}

impl Extend<BlockDigest> for Composer {
    fn extend<I: IntoIterator<Item = BlockDigest>>(&mut self, iter: I) {
        for digest in iter {
            self.push(&digest);
        }
    }
}

impl FromIterator<BlockDigest> for Composer {
    fn from_iter<I: IntoIterator<Item = BlockDigest>>(iter: I) -> Self {
        let mut composer = Composer::new();
        composer.extend(iter);
        composer
    }
}
