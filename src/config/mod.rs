//! Configuration for fingerprinting behavior.
//!
//! - [`ChunkSize`] - Validated, non-zero block size in bytes
//! - [`ReadMode`] - How a block is assembled from reads
//! - [`FingerprintConfig`] - Chunk size, read mode and block data retention
//!
//! # Example
//!
//! ```
//! use etagrs::{ChunkSize, FingerprintConfig, ReadMode};
//!
//! // 16 MiB blocks, tolerant of short reads
//! let config = FingerprintConfig::new(ChunkSize::from_mebibytes(16)?)
//!     .with_read_mode(ReadMode::FillBlock);
//!
//! assert_eq!(config.chunk_size().get(), 16 * 1024 * 1024);
//! # Ok::<(), etagrs::EtagError>(())
//! ```

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::EtagError;

/// One mebibyte (1,048,576 bytes).
pub const MEBIBYTE: usize = 1024 * 1024;

/// Default chunk size (8 MiB), the usual multipart upload part size.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * MEBIBYTE;

/// Smallest size a chunked store accepts for a non-final part (5 MiB).
///
/// Informational only. Fingerprinting accepts any positive chunk size.
pub const MIN_PART_SIZE: usize = 5 * MEBIBYTE;

/// Number of bytes per block.
///
/// Must be at least 1. Source lengths that are not a multiple of the chunk
/// size are fine; the final block is simply shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkSize(NonZeroUsize);

impl ChunkSize {
    /// Creates a chunk size of `bytes` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidParameter`] if `bytes` is zero.
    pub fn new(bytes: usize) -> Result<Self, EtagError> {
        NonZeroUsize::new(bytes)
            .map(Self)
            .ok_or_else(|| EtagError::invalid("chunk size must be positive"))
    }

    /// Creates a chunk size of `mebibytes` MiB.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidParameter`] if `mebibytes` is zero or the
    /// byte count does not fit in `usize`.
    ///
    /// # Example
    ///
    /// ```
    /// use etagrs::ChunkSize;
    ///
    /// assert_eq!(ChunkSize::from_mebibytes(8)?.get(), 8_388_608);
    /// assert!(ChunkSize::from_mebibytes(0).is_err());
    /// # Ok::<(), etagrs::EtagError>(())
    /// ```
    pub fn from_mebibytes(mebibytes: u64) -> Result<Self, EtagError> {
        let bytes = usize::try_from(mebibytes)
            .ok()
            .and_then(|m| m.checked_mul(MEBIBYTE))
            .ok_or_else(|| EtagError::invalid("chunk size overflows usize"))?;
        Self::new(bytes)
    }

    /// Returns the size in bytes.
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Returns the size in whole mebibytes, if it is an exact multiple.
    pub fn as_mebibytes(self) -> Option<u64> {
        let bytes = self.get();
        (bytes % MEBIBYTE == 0).then(|| (bytes / MEBIBYTE) as u64)
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        const DEFAULT: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CHUNK_SIZE) {
            Some(size) => size,
            None => panic!("default chunk size is zero"),
        };
        Self(DEFAULT)
    }
}

impl TryFrom<usize> for ChunkSize {
    type Error = EtagError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl TryFrom<i64> for ChunkSize {
    type Error = EtagError;

    fn try_from(bytes: i64) -> Result<Self, Self::Error> {
        if bytes <= 0 {
            return Err(EtagError::invalid("chunk size must be positive"));
        }
        let bytes =
            usize::try_from(bytes).map_err(|_| EtagError::invalid("chunk size overflows usize"))?;
        Self::new(bytes)
    }
}

impl From<ChunkSize> for usize {
    fn from(size: ChunkSize) -> usize {
        size.get()
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_mebibytes() {
            Some(mib) => write!(f, "{} MiB", mib),
            None => write!(f, "{} bytes", self.get()),
        }
    }
}

/// How each block is assembled from reads on the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReadMode {
    /// One bounded read per block. A read shorter than the chunk size is the
    /// final block.
    #[default]
    SingleRead,

    /// Keep reading until the block is full or the source reports
    /// end-of-stream.
    ///
    /// Use for pipes, sockets and other sources whose reads may legitimately
    /// return fewer bytes than requested before they are exhausted.
    FillBlock,
}

/// Configuration for a fingerprinting run.
///
/// # Example
///
/// ```
/// use etagrs::{ChunkSize, FingerprintConfig};
///
/// let config = FingerprintConfig::default().with_keep_data(true);
/// assert_eq!(config.chunk_size(), ChunkSize::default());
/// assert!(config.keep_data());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FingerprintConfig {
    chunk_size: ChunkSize,
    read_mode: ReadMode,
    keep_data: bool,
}

impl FingerprintConfig {
    /// Creates a configuration with the given chunk size and defaults
    /// otherwise.
    pub fn new(chunk_size: ChunkSize) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }

    /// Creates a configuration from a raw byte count.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidParameter`] if `bytes` is zero.
    pub fn with_bytes(bytes: usize) -> Result<Self, EtagError> {
        Ok(Self::new(ChunkSize::new(bytes)?))
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: ChunkSize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the read mode.
    pub fn with_read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    /// Sets whether yielded blocks carry a copy of their bytes.
    pub fn with_keep_data(mut self, keep_data: bool) -> Self {
        self.keep_data = keep_data;
        self
    }

    /// Returns the chunk size.
    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    /// Returns the read mode.
    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// Returns whether blocks carry their bytes.
    pub fn keep_data(&self) -> bool {
        self.keep_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_default() {
        assert_eq!(ChunkSize::default().get(), 8 * 1024 * 1024);
        assert_eq!(ChunkSize::default().as_mebibytes(), Some(8));
    }

    #[test]
    fn test_chunk_size_zero_rejected() {
        assert!(matches!(
            ChunkSize::new(0),
            Err(EtagError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_chunk_size_negative_rejected() {
        assert!(ChunkSize::try_from(-1i64).is_err());
        assert!(ChunkSize::try_from(0i64).is_err());
        assert_eq!(ChunkSize::try_from(4i64).unwrap().get(), 4);
    }

    #[test]
    fn test_from_mebibytes() {
        assert_eq!(ChunkSize::from_mebibytes(16).unwrap().get(), 16 * MEBIBYTE);
        assert!(ChunkSize::from_mebibytes(0).is_err());
        assert!(ChunkSize::from_mebibytes(u64::MAX).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ChunkSize::from_mebibytes(5).unwrap().to_string(), "5 MiB");
        assert_eq!(ChunkSize::new(1000).unwrap().to_string(), "1000 bytes");
    }

    #[test]
    fn test_config_builder() {
        let config = FingerprintConfig::with_bytes(4)
            .unwrap()
            .with_read_mode(ReadMode::FillBlock)
            .with_keep_data(true);
        assert_eq!(config.chunk_size().get(), 4);
        assert_eq!(config.read_mode(), ReadMode::FillBlock);
        assert!(config.keep_data());
    }

    #[test]
    fn test_config_default() {
        let config = FingerprintConfig::default();
        assert_eq!(config.chunk_size().get(), DEFAULT_CHUNK_SIZE);
        assert_eq!(config.read_mode(), ReadMode::SingleRead);
        assert!(!config.keep_data());
    }
}
