//! Block types.
//!
//! - [`Block`] - One fixed-size slice of the source with its position and digest
//! - [`BlockDigest`] - 16-byte MD5 digest

mod data;
mod digest;

pub use data::Block;
pub use digest::BlockDigest;
