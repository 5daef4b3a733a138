//! ETag parsing and local-versus-remote verification.
//!
//! A chunked store reports one of two shapes for an object:
//!
//! - `<md5>` for objects stored in a single request
//! - `<md5 of part md5s>-<parts>` for objects stored in parts
//!
//! [`verify`] recomputes the matching value for a local source and reports
//! how it compares. A block-count mismatch usually means the chunk size
//! assumed locally differs from the one used at upload time;
//! [`candidate_chunk_sizes`] lists the sizes worth retrying with.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::block::BlockDigest;
use crate::config::{ChunkSize, FingerprintConfig, MEBIBYTE, ReadMode};
use crate::error::{EtagError, Result};
use crate::fingerprint::{CompositeFingerprint, Fingerprinter, read_block};
use crate::hash::Md5Hasher;

/// Upper bound on the number of sizes [`candidate_chunk_sizes`] returns.
pub const MAX_CANDIDATES: usize = 16;

/// Read size used when digesting a whole source in one piece.
const DIGEST_BUFFER_SIZE: usize = 256 * 1024;

/// An ETag as reported by a chunked store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Etag {
    /// Plain MD5 of the whole object.
    Simple(BlockDigest),
    /// Composite fingerprint of an object stored in parts.
    Composite(CompositeFingerprint),
}

impl Etag {
    /// Parses an ETag, tolerating surrounding whitespace and double quotes.
    ///
    /// # Example
    ///
    /// ```
    /// use etagrs::Etag;
    ///
    /// let etag = Etag::parse("\"F066924E6930A631727FC89361C46CDC-3\"")?;
    /// assert_eq!(etag.parts(), Some(3));
    /// assert_eq!(etag.to_string(), "f066924e6930a631727fc89361c46cdc-3");
    /// # Ok::<(), etagrs::EtagError>(())
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let unquoted = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed);

        if !unquoted.contains('-') {
            return BlockDigest::from_hex(unquoted)
                .map(Etag::Simple)
                .ok_or_else(|| EtagError::MalformedEtag {
                    value: value.to_string(),
                    reason: "digest is not 32 hex digits",
                });
        }

        let fp: CompositeFingerprint = unquoted.parse().map_err(|e| match e {
            EtagError::MalformedEtag { reason, .. } => EtagError::MalformedEtag {
                value: value.to_string(),
                reason,
            },
            other => other,
        })?;
        if fp.blocks() == 0 {
            return Err(EtagError::MalformedEtag {
                value: value.to_string(),
                reason: "a multipart etag has at least one part",
            });
        }
        Ok(Etag::Composite(fp))
    }

    /// Returns the part count for composite ETags.
    pub fn parts(&self) -> Option<u64> {
        match self {
            Etag::Simple(_) => None,
            Etag::Composite(fp) => Some(fp.blocks()),
        }
    }

    /// Returns the digest, whichever shape the ETag has.
    pub fn digest(&self) -> BlockDigest {
        match self {
            Etag::Simple(digest) => *digest,
            Etag::Composite(fp) => fp.digest(),
        }
    }
}

impl FromStr for Etag {
    type Err = EtagError;

    fn from_str(s: &str) -> Result<Self> {
        Etag::parse(s)
    }
}

impl From<CompositeFingerprint> for Etag {
    fn from(fp: CompositeFingerprint) -> Self {
        Etag::Composite(fp)
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Etag::Simple(digest) => write!(f, "{}", digest),
            Etag::Composite(fp) => write!(f, "{}", fp),
        }
    }
}

/// Outcome of comparing a local source with a reported ETag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The local source produces the reported ETag.
    Match,
    /// The local source splits into a different number of blocks.
    ///
    /// Usually the chunk size differs from the one used at upload time.
    BlockCountMismatch {
        /// Blocks counted locally.
        local: u64,
        /// Parts reported by the store.
        remote: u64,
    },
    /// The block structure agrees but the content differs.
    DigestMismatch {
        /// The locally computed ETag.
        local: Etag,
        /// The reported ETag.
        remote: Etag,
    },
}

impl Verdict {
    /// Returns true for [`Verdict::Match`].
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Match => write!(f, "match"),
            Verdict::BlockCountMismatch { local, remote } => write!(
                f,
                "block count mismatch: {} local, {} remote (wrong chunk size?)",
                local, remote
            ),
            Verdict::DigestMismatch { local, remote } => {
                write!(f, "content mismatch: local {}, remote {}", local, remote)
            }
        }
    }
}

/// Computes the plain MD5 of a whole source with a bounded buffer.
///
/// # Example
///
/// ```
/// use etagrs::digest_reader;
///
/// assert_eq!(
///     digest_reader(&b"AAAABBBBC"[..])?.to_hex(),
///     "dacae6b6cfddd293b2713ac913171bd8"
/// );
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub fn digest_reader<R: Read>(mut reader: R) -> Result<BlockDigest> {
    let mut hasher = Md5Hasher::new();
    let mut buffer = vec![0u8; DIGEST_BUFFER_SIZE];
    loop {
        let n = read_block(&mut reader, &mut buffer, ReadMode::SingleRead)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize())
}

/// Compares `reader` against a reported ETag.
///
/// Composite ETags are recomputed with `chunk_size` blocks, filling each
/// block completely; simple ETags are compared against the plain MD5 of the
/// source and ignore `chunk_size`.
///
/// # Example
///
/// ```
/// use etagrs::{ChunkSize, Etag, Verdict, verify};
///
/// let remote = Etag::parse("f066924e6930a631727fc89361c46cdc-3")?;
/// let verdict = verify(&b"AAAABBBBC"[..], &remote, ChunkSize::new(4)?)?;
/// assert_eq!(verdict, Verdict::Match);
///
/// let verdict = verify(&b"AAAABBBBC"[..], &remote, ChunkSize::new(8)?)?;
/// assert_eq!(verdict, Verdict::BlockCountMismatch { local: 2, remote: 3 });
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub fn verify<R: Read>(reader: R, remote: &Etag, chunk_size: ChunkSize) -> Result<Verdict> {
    verify_with(
        reader,
        remote,
        FingerprintConfig::new(chunk_size).with_read_mode(ReadMode::FillBlock),
    )
}

/// Compares `reader` against a reported ETag using an explicit configuration.
///
/// Composite ETags are recomputed with the configured chunk size and read
/// mode. Simple ETags only need the plain MD5, so `config` is not consulted.
pub fn verify_with<R: Read>(reader: R, remote: &Etag, config: FingerprintConfig) -> Result<Verdict> {
    let local = match remote {
        Etag::Simple(_) => Etag::Simple(digest_reader(reader)?),
        Etag::Composite(_) => Etag::Composite(Fingerprinter::new(config).fingerprint(reader)?),
    };

    let verdict = compare(&local, remote);
    match verdict {
        Verdict::Match => debug!(etag = %remote, "etag verified"),
        ref mismatch => warn!(
            %local,
            %remote,
            chunk_size = %config.chunk_size(),
            "etag verification failed: {}",
            mismatch
        ),
    }
    Ok(verdict)
}

/// Opens `path` and compares it against a reported ETag.
///
/// # Errors
///
/// Returns [`EtagError::SourceOpen`] if the file cannot be opened and
/// [`EtagError::Io`] if reading it fails.
pub fn verify_file(path: impl AsRef<Path>, remote: &Etag, chunk_size: ChunkSize) -> Result<Verdict> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| EtagError::SourceOpen {
        path: path.to_path_buf(),
        source,
    })?;
    verify(file, remote, chunk_size)
}

/// Compares two already computed ETags.
pub fn compare(local: &Etag, remote: &Etag) -> Verdict {
    if let (Some(l), Some(r)) = (local.parts(), remote.parts()) {
        if l != r {
            return Verdict::BlockCountMismatch {
                local: l,
                remote: r,
            };
        }
    }
    if local == remote {
        Verdict::Match
    } else {
        Verdict::DigestMismatch {
            local: *local,
            remote: *remote,
        }
    }
}

/// Lists whole-MiB chunk sizes that split `object_len` bytes into exactly
/// `parts` blocks, smallest first.
///
/// Returns at most [`MAX_CANDIDATES`] sizes. A single part needs only the
/// smallest size, since every larger one yields the same fingerprint.
///
/// # Example
///
/// ```
/// use etagrs::{ChunkSize, candidate_chunk_sizes};
///
/// let sizes = candidate_chunk_sizes(9 * 1024 * 1024, 2);
/// assert_eq!(sizes.first(), Some(&ChunkSize::from_mebibytes(5)?));
/// assert_eq!(sizes.last(), Some(&ChunkSize::from_mebibytes(8)?));
/// # Ok::<(), etagrs::EtagError>(())
/// ```
pub fn candidate_chunk_sizes(object_len: u64, parts: u64) -> Vec<ChunkSize> {
    let mut sizes = Vec::new();
    if object_len == 0 || parts == 0 {
        return sizes;
    }

    let mib = MEBIBYTE as u64;
    let mut size_mib = object_len.div_ceil(parts).div_ceil(mib).max(1);
    while sizes.len() < MAX_CANDIDATES {
        let Some(bytes) = size_mib.checked_mul(mib) else {
            break;
        };
        let blocks = object_len.div_ceil(bytes);
        if blocks < parts {
            break;
        }
        if blocks == parts {
            match ChunkSize::from_mebibytes(size_mib) {
                Ok(size) => sizes.push(size),
                Err(_) => break,
            }
            if parts == 1 {
                break;
            }
        }
        size_mib += 1;
    }
    sizes
}
