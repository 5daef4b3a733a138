//! Async streaming support for fingerprinting.
//!
//! This module provides asynchronous fingerprinting using the
//! `futures-io::AsyncRead` trait, making it runtime-agnostic and compatible
//! with tokio, async-std, smol, and other async runtimes.
//!
//! - [`BlockStream`] - Stream of hashed blocks from an async reader
//! - [`fingerprint_async`] - Future resolving to the composite fingerprint
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{BlockStream, FingerprintFuture, fingerprint_async};
