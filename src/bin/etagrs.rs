//! etagrs - composite ETag calculator
//!
//! Prints the multipart ETag of local files, or checks them against an ETag
//! reported by an object store.
//!
//! Usage:
//!     etagrs --chunk-size-mb 16 backup.tar
//!     etagrs --expect '"9bb58f26192e4ba00f01e2e7b136bbd8-3"' backup.tar

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use etagrs::{
    ChunkSize, Composer, Etag, FingerprintConfig, Fingerprinter, ReadMode, Verdict,
    candidate_chunk_sizes, verify_with,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "etagrs")]
#[command(about = "Compute or verify multipart (composite) ETags of local files")]
#[command(version)]
struct Args {
    /// Files to fingerprint
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Chunk size in MiB used when the object was uploaded
    #[arg(short = 'm', long, env = "ETAGRS_CHUNK_SIZE_MB", default_value_t = 8)]
    chunk_size_mb: u64,

    /// Chunk size in bytes (overrides --chunk-size-mb)
    #[arg(short = 'c', long)]
    chunk_size: Option<usize>,

    /// Treat a short read as end-of-file instead of filling each block
    /// (applies to verification too)
    #[arg(long)]
    single_read: bool,

    /// ETag reported by the store; exit with status 1 on mismatch
    #[arg(short, long)]
    expect: Option<String>,

    /// Print each block's digest
    #[arg(short, long, conflicts_with = "expect")]
    blocks: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn chunk_size(&self) -> Result<ChunkSize> {
        let size = match self.chunk_size {
            Some(bytes) => ChunkSize::new(bytes)?,
            None => ChunkSize::from_mebibytes(self.chunk_size_mb)?,
        };
        Ok(size)
    }

    fn read_mode(&self) -> ReadMode {
        if self.single_read {
            ReadMode::SingleRead
        } else {
            ReadMode::FillBlock
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns false if any file failed verification.
fn run(args: &Args) -> Result<bool> {
    let chunk_size = args.chunk_size()?;
    let expected = args
        .expect
        .as_deref()
        .map(Etag::parse)
        .transpose()
        .context("parsing --expect")?;

    let fingerprinter = Fingerprinter::new(
        FingerprintConfig::new(chunk_size).with_read_mode(args.read_mode()),
    );
    info!(%chunk_size, files = args.files.len(), "starting");

    let mut all_match = true;
    for path in &args.files {
        if let Some(remote) = &expected {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            let verdict = verify_with(file, remote, *fingerprinter.config())
                .with_context(|| format!("verifying {}", path.display()))?;
            println!("{}  {}  {}", remote, verdict, path.display());

            if let Verdict::BlockCountMismatch { remote: parts, .. } = verdict {
                let len = std::fs::metadata(path)
                    .with_context(|| format!("reading metadata of {}", path.display()))?
                    .len();
                let candidates: Vec<String> = candidate_chunk_sizes(len, parts)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                if !candidates.is_empty() {
                    warn!(
                        file = %path.display(),
                        "chunk sizes that give {} parts: {}",
                        parts,
                        candidates.join(", ")
                    );
                }
            }
            all_match &= verdict.is_match();
            continue;
        }

        let file = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        if args.blocks {
            let mut composer = Composer::new();
            for block in fingerprinter.blocks(file) {
                let block = block.with_context(|| format!("reading {}", path.display()))?;
                println!(
                    "  {:>6}  {:>12}  {:>10}  {}",
                    block.part_number(),
                    block.offset,
                    block.len,
                    block.digest
                );
                composer.push(&block.digest);
            }
            println!("{}  {}", composer.finish(), path.display());
        } else {
            let fp = fingerprinter
                .fingerprint(file)
                .with_context(|| format!("reading {}", path.display()))?;
            println!("{}  {}", fp, path.display());
        }
    }

    Ok(all_match)
}
