//! Async fingerprinting with tokio.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io -- /path/to/file

use std::env;

use etagrs::{FingerprintConfig, fingerprint_async};
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    let file = tokio::fs::File::open(&path).await?;
    let fp = fingerprint_async(file.compat(), FingerprintConfig::default()).await?;

    println!("{}  {}", fp, path);
    Ok(())
}
