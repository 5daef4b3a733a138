//! Composite fingerprinting of byte streams.
//!
//! - [`Fingerprinter`] - Configured entry point for readers and in-memory data
//! - [`BlockIter`] - Lazily reads and hashes one block per step
//! - [`Composer`] - Aggregates block digests into the composite digest
//! - [`CompositeFingerprint`] - `<hex>-<count>` result

mod composite;
mod iter;
mod read;

pub use composite::{Composer, CompositeFingerprint};
pub use iter::{BlockIter, Fingerprinter, fingerprint, fingerprint_file};

pub(crate) use read::read_block;
