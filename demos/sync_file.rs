//! File fingerprinting example.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/file [chunk-size-mib]

use std::env;
use std::fs::File;

use etagrs::{ChunkSize, FingerprintConfig, Fingerprinter, ReadMode};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let mib: u64 = env::args().nth(2).map(|s| s.parse::<u64>()).transpose()?.unwrap_or(8);

    println!("Fingerprinting file: {}\n", path);

    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    println!("File size: {} bytes\n", metadata.len());

    let config = FingerprintConfig::new(ChunkSize::from_mebibytes(mib)?)
        .with_read_mode(ReadMode::FillBlock);
    let fingerprinter = Fingerprinter::new(config);

    let mut composer = etagrs::Composer::new();
    for block in fingerprinter.blocks(file) {
        let block = block?;
        println!(
            "Part {:>5}: offset={:>12}, len={:>10}, md5={}",
            block.part_number(),
            block.offset,
            block.len,
            block.digest
        );
        composer.push(&block.digest);
    }

    println!("\nETag: {}", composer.finish());
    Ok(())
}
