//! The Block type - one hashed slice of the source.

use bytes::Bytes;
use std::fmt;
use std::ops::Range;

use super::BlockDigest;

/// One fixed-size block of the source and its digest.
///
/// Every block except possibly the last is exactly the configured chunk size.
///
/// # Example
///
/// ```
/// use etagrs::{Block, BlockDigest};
///
/// let block = Block::new(2, 8, 4, BlockDigest::new([0u8; 16]));
///
/// assert_eq!(block.part_number(), 3);
/// assert_eq!(block.range(), 8..12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Zero-based position of the block in the source.
    pub index: u64,

    /// Byte offset of the block in the source.
    pub offset: u64,

    /// Number of bytes in the block.
    pub len: usize,

    /// MD5 digest of the block's bytes.
    pub digest: BlockDigest,

    /// The block's bytes, when the run was configured to keep them.
    pub data: Option<Bytes>,
}

impl Block {
    /// Creates a block without data.
    pub fn new(index: u64, offset: u64, len: usize, digest: BlockDigest) -> Self {
        Self {
            index,
            offset,
            len,
            digest,
            data: None,
        }
    }

    /// Attaches the block's bytes.
    pub fn set_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Returns the one-based part number a chunked store would assign.
    pub fn part_number(&self) -> u64 {
        self.index + 1
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }

    /// Returns the block as a byte range of the source.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.end()
    }

    /// Returns true if the block holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Consumes the block and returns its data, if kept.
    pub fn into_data(self) -> Option<Bytes> {
        self.data
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block #{} ({} bytes @ {}, md5={})",
            self.part_number(),
            self.len,
            self.offset,
            self.digest
        )
    }
}
