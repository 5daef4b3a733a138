//! etagrs
//!
//! Streaming composite fingerprints (multipart ETags) for Rust.
//!
//! `etagrs` reads a byte stream in fixed-size blocks, hashes each block with
//! MD5, hashes the concatenated block digests and reports the result as
//! `<hex digest>-<block count>`. For the same bytes and chunk size this is
//! exactly the ETag a chunked object store reports for an object uploaded in
//! parts, so it is used to:
//!
//! - confirm an upload is byte-identical to the local copy
//! - detect corruption of a stored object
//! - detect a wrong chunk-size assumption
//!
//! The crate intentionally:
//! - does NOT talk to any object store
//! - does NOT resolve credentials or sessions
//! - does NOT retry reads
//! - does NOT buffer whole sources (memory is one block)
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use etagrs::{ChunkSize, EtagError, fingerprint};
//!
//! fn main() -> Result<(), EtagError> {
//!     let file = File::open("data.bin")?;
//!     let fp = fingerprint(file, ChunkSize::from_mebibytes(8)?)?;
//!     println!("{fp}");
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use etagrs::{fingerprint_async, FingerprintConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead>(reader: R) -> Result<(), etagrs::EtagError> {
//!     let fp = fingerprint_async(reader, FingerprintConfig::default()).await?;
//!     println!("{fp}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod block;
mod config;
mod error;
mod etag;
mod fingerprint;
mod url;

mod hash; // internal md5 impl

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface
//

pub use block::{Block, BlockDigest};
pub use config::{
    ChunkSize, DEFAULT_CHUNK_SIZE, FingerprintConfig, MEBIBYTE, MIN_PART_SIZE, ReadMode,
};
pub use error::{EtagError, Result};
pub use etag::{
    Etag, MAX_CANDIDATES, Verdict, candidate_chunk_sizes, compare, digest_reader, verify,
    verify_file, verify_with,
};
pub use fingerprint::{
    BlockIter, Composer, CompositeFingerprint, Fingerprinter, fingerprint, fingerprint_file,
};
pub use url::ObjectUrl;

#[cfg(feature = "async-io")]
pub use async_stream::{BlockStream, FingerprintFuture, fingerprint_async};
