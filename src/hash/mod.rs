//! Digest implementation for block and composite hashing.
//!
//! - [`Md5Hasher`] - MD5, the digest chunked stores report in their ETags

mod hasher;

pub use hasher::Md5Hasher;
