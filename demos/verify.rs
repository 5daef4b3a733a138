//! Verifying a local file against a reported ETag.
//!
//! Run with:
//!     cargo run --example verify -- /path/to/file '"<etag>"' [chunk-size-mib]

use std::env;

use etagrs::{ChunkSize, Etag, Verdict, candidate_chunk_sizes, verify_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let (Some(path), Some(etag)) = (args.next(), args.next()) else {
        eprintln!("usage: verify <file> <etag> [chunk-size-mib]");
        std::process::exit(2);
    };
    let mib: u64 = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(8);

    let remote = Etag::parse(&etag)?;
    let verdict = verify_file(&path, &remote, ChunkSize::from_mebibytes(mib)?)?;
    println!("{}: {}", path, verdict);

    if let Verdict::BlockCountMismatch { remote: parts, .. } = verdict {
        let len = std::fs::metadata(&path)?.len();
        for size in candidate_chunk_sizes(len, parts) {
            println!("  try {}", size);
        }
    }
    Ok(())
}
