//! Synchronous fingerprinting - Fingerprinter and BlockIter.
//!
//! This module implements the blocking API over [`std::io::Read`]:
//!
//! - [`Fingerprinter`] - Configures and runs fingerprinting
//! - [`BlockIter`] - Iterator that reads and hashes one block per step
//!
//! # Example
//!
//! ```no_run
//! use etagrs::{ChunkSize, fingerprint_file};
//!
//! let fp = fingerprint_file("backup.tar", ChunkSize::from_mebibytes(8)?)?;
//! println!("{fp}");
//! # Ok::<(), etagrs::EtagError>(())
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use tracing::{debug, trace};

use super::read_block;
use super::{Composer, CompositeFingerprint};
use crate::block::Block;
use crate::config::{ChunkSize, FingerprintConfig, ReadMode};
use crate::error::{EtagError, Result};
use crate::hash::Md5Hasher;

/// Computes composite fingerprints with a fixed configuration.
///
/// # Example
///
/// ```
/// use etagrs::{FingerprintConfig, Fingerprinter};
/// use std::io::Cursor;
///
/// let fingerprinter = Fingerprinter::new(FingerprintConfig::with_bytes(4)?);
/// let fp = fingerprinter.fingerprint(Cursor::new(b"AAAABBBBC"))?;
///
/// assert_eq!(fp.to_string(), "f066924e6930a631727fc89361c46cdc-3");
/// # Ok::<(), etagrs::EtagError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fingerprinter {
    config: FingerprintConfig,
}

impl Fingerprinter {
    /// Creates a fingerprinter with the given configuration.
    pub fn new(config: FingerprintConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Creates a block iterator over a reader.
    ///
    /// The iterator reads lazily, one block per step, into a single reusable
    /// buffer of the configured chunk size.
    pub fn blocks<R: Read>(&self, reader: R) -> BlockIter<R> {
        BlockIter::new(reader, self.config)
    }

    /// Reads `reader` to the end and returns its composite fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::Io`] if a read fails. No partial fingerprint is
    /// produced.
    pub fn fingerprint<R: Read>(&self, reader: R) -> Result<CompositeFingerprint> {
        let mut composer = Composer::new();
        let mut bytes = 0u64;
        for block in self.blocks(reader) {
            let block = block?;
            bytes += block.len as u64;
            composer.push(&block.digest);
        }

        let fp = composer.finish();
        debug!(
            blocks = fp.blocks(),
            bytes,
            chunk_size = self.config.chunk_size().get(),
            fingerprint = %fp,
            "computed composite fingerprint"
        );
        Ok(fp)
    }

    /// Splits an in-memory buffer into hashed blocks.
    ///
    /// Block data, when kept, is zero-copy sliced from `data`.
    ///
    /// # Example
    ///
    /// ```
    /// use etagrs::{FingerprintConfig, Fingerprinter};
    ///
    /// let fingerprinter = Fingerprinter::new(FingerprintConfig::with_bytes(4)?.with_keep_data(true));
    /// let blocks = fingerprinter.blocks_from_bytes(&b"AAAABBBBC"[..]);
    ///
    /// assert_eq!(blocks.len(), 3);
    /// assert_eq!(blocks[2].data.as_deref(), Some(&b"C"[..]));
    /// # Ok::<(), etagrs::EtagError>(())
    /// ```
    pub fn blocks_from_bytes(&self, data: impl Into<Bytes>) -> Vec<Block> {
        let data = data.into();
        let size = self.config.chunk_size().get();

        (0..data.len())
            .step_by(size)
            .enumerate()
            .map(|(index, start)| {
                let end = (start + size).min(data.len());
                let block = Block::new(
                    index as u64,
                    start as u64,
                    end - start,
                    Md5Hasher::hash(&data[start..end]),
                );
                if self.config.keep_data() {
                    block.set_data(data.slice(start..end))
                } else {
                    block
                }
            })
            .collect()
    }

    /// Computes the composite fingerprint of an in-memory buffer.
    ///
    /// Identical to [`Fingerprinter::fingerprint`] over the same bytes.
    pub fn fingerprint_bytes(&self, data: impl AsRef<[u8]>) -> CompositeFingerprint {
        data.as_ref()
            .chunks(self.config.chunk_size().get())
            .map(Md5Hasher::hash)
            .collect::<Composer>()
            .finish()
    }
}

/// Computes the composite fingerprint of `reader` split into `chunk_size`
/// blocks.
///
/// Uses [`ReadMode::SingleRead`]: a read shorter than `chunk_size` ends the
/// source. Wrap sources that may return short reads early in a
/// [`Fingerprinter`] configured with [`ReadMode::FillBlock`].
///
/// # Example
///
/// ```
/// use etagrs::{ChunkSize, fingerprint};
///
/// let fp = fingerprint(&b""[..], ChunkSize::new(4)?)?;
/// assert_eq!(fp.to_string(), "d41d8cd98f00b204e9800998ecf8427e-0");
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub fn fingerprint<R: Read>(reader: R, chunk_size: ChunkSize) -> Result<CompositeFingerprint> {
    Fingerprinter::new(FingerprintConfig::new(chunk_size)).fingerprint(reader)
}

/// Opens `path` and computes its composite fingerprint.
///
/// Blocks are filled completely before hashing, so very large chunk sizes
/// that the OS serves in several reads still hash correctly.
///
/// # Errors
///
/// Returns [`EtagError::SourceOpen`] if the file cannot be opened and
/// [`EtagError::Io`] if reading it fails.
pub fn fingerprint_file(
    path: impl AsRef<Path>,
    chunk_size: ChunkSize,
) -> Result<CompositeFingerprint> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| EtagError::SourceOpen {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %chunk_size, "fingerprinting file");

    Fingerprinter::new(
        FingerprintConfig::new(chunk_size).with_read_mode(ReadMode::FillBlock),
    )
    .fingerprint(file)
}

/// An iterator that reads and hashes one block per step.
///
/// Yields `Result<Block, EtagError>`. After the first error or the final
/// (short or empty) read, the iterator is exhausted.
///
/// # Example
///
/// ```
/// use etagrs::{FingerprintConfig, Fingerprinter};
/// use std::io::Cursor;
///
/// let fingerprinter = Fingerprinter::new(FingerprintConfig::with_bytes(4)?);
/// let lens: Vec<usize> = fingerprinter
///     .blocks(Cursor::new(b"AAAABBBBC"))
///     .map(|b| b.map(|b| b.len))
///     .collect::<Result<_, _>>()?;
///
/// assert_eq!(lens, [4, 4, 1]);
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub struct BlockIter<R> {
    reader: R,
    config: FingerprintConfig,
    buffer: Vec<u8>,
    index: u64,
    offset: u64,
    finished: bool,
}

impl<R: Read> BlockIter<R> {
    fn new(reader: R, config: FingerprintConfig) -> Self {
        Self {
            reader,
            config,
            buffer: vec![0u8; config.chunk_size().get()],
            index: 0,
            offset: 0,
            finished: false,
        }
    }

    /// Builds the block for the first `len` bytes of the buffer and advances
    /// the position.
    fn emit_block(&mut self, len: usize) -> Block {
        let bytes = &self.buffer[..len];
        let block = Block::new(self.index, self.offset, len, Md5Hasher::hash(bytes));
        let block = if self.config.keep_data() {
            block.set_data(Bytes::copy_from_slice(bytes))
        } else {
            block
        };

        trace!(
            part = block.part_number(),
            offset = block.offset,
            len,
            md5 = %block.digest,
            "hashed block"
        );

        self.index += 1;
        self.offset += len as u64;
        block
    }
}

impl<R: Read> Iterator for BlockIter<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match read_block(&mut self.reader, &mut self.buffer, self.config.read_mode()) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(n) => {
                // A short block is the last one
                if n < self.buffer.len() {
                    self.finished = true;
                }
                Some(Ok(self.emit_block(n)))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn fingerprinter(size: usize) -> Fingerprinter {
        Fingerprinter::new(FingerprintConfig::with_bytes(size).unwrap())
    }

    #[test]
    fn test_empty_source() {
        let fp = fingerprinter(4).fingerprint(Cursor::new(b"")).unwrap();
        assert_eq!(fp.to_string(), "d41d8cd98f00b204e9800998ecf8427e-0");
    }

    #[test]
    fn test_three_blocks_with_short_tail() {
        let fp = fingerprinter(4).fingerprint(Cursor::new(b"AAAABBBBC")).unwrap();
        assert_eq!(fp.to_string(), "f066924e6930a631727fc89361c46cdc-3");
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_block() {
        let fp = fingerprinter(4).fingerprint(Cursor::new(b"AAAABBBB")).unwrap();
        assert_eq!(fp.to_string(), "5e63e8b777cb8ae2558cbb2fcfba9b95-2");
    }

    #[test]
    fn test_block_offsets() {
        let data: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();
        let blocks: Vec<_> = fingerprinter(64)
            .blocks(Cursor::new(&data))
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(blocks.len(), 16);
        let mut expected_offset = 0u64;
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.index, i as u64);
            assert_eq!(block.offset, expected_offset);
            expected_offset += block.len as u64;
        }
        assert_eq!(expected_offset, 1000);
        assert_eq!(blocks.last().unwrap().len, 1000 - 15 * 64);
    }

    #[test]
    fn test_keep_data() {
        let fingerprinter = Fingerprinter::new(
            FingerprintConfig::with_bytes(4).unwrap().with_keep_data(true),
        );
        let blocks: Vec<_> = fingerprinter
            .blocks(Cursor::new(b"AAAABBBBC"))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(blocks[1].data.as_deref(), Some(&b"BBBB"[..]));
        assert_eq!(blocks[2].data.as_deref(), Some(&b"C"[..]));
    }

    #[test]
    fn test_bytes_matches_reader() {
        let data: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
        let f = fingerprinter(1024);
        let expected = f.fingerprint(Cursor::new(&data)).unwrap();

        assert_eq!(f.fingerprint_bytes(&data), expected);
        assert_eq!(expected.to_string(), "d0853182f83feb49c684042cca583253-10");

        let blocks = f.blocks_from_bytes(data);
        let composed = blocks.iter().map(|b| b.digest).collect::<Composer>().finish();
        assert_eq!(composed, expected);
    }

    #[test]
    fn test_read_error_stops_iteration() {
        struct FailAfter(usize);

        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.0 == 0 {
                    return Err(io::Error::other("disk on fire"));
                }
                self.0 -= 1;
                buf.fill(b'x');
                Ok(buf.len())
            }
        }

        let mut iter = fingerprinter(4).blocks(FailAfter(1));
        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(iter.next(), Some(Err(EtagError::Io(_)))));
        assert!(iter.next().is_none());

        assert!(matches!(
            fingerprinter(4).fingerprint(FailAfter(2)),
            Err(EtagError::Io(_))
        ));
    }

    #[test]
    fn test_fingerprint_file_missing() {
        let err = fingerprint_file("/definitely/not/here", ChunkSize::new(4).unwrap()).unwrap_err();
        assert!(matches!(err, EtagError::SourceOpen { .. }));
    }
}
