//! Async stream adapter for fingerprinting.
//!
//! # Example
//!
//! ```ignore
//! use etagrs::{FingerprintConfig, fingerprint_async};
//! use tokio_util::compat::TokioAsyncReadCompatExt;
//!
//! async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = tokio::fs::File::open("backup.tar").await?;
//!     let fp = fingerprint_async(file.compat(), FingerprintConfig::default()).await?;
//!     println!("{fp}");
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;
use tracing::{debug, trace};

use crate::block::Block;
use crate::config::{FingerprintConfig, ReadMode};
use crate::error::EtagError;
use crate::fingerprint::{Composer, CompositeFingerprint};
use crate::hash::Md5Hasher;

pin_project! {
    /// A stream that reads and hashes one block at a time from an async
    /// reader.
    ///
    /// Same block semantics as [`crate::BlockIter`]: the stream ends after
    /// the first error or the final (short or empty) read.
    pub struct BlockStream<R> {
        #[pin]
        reader: R,
        config: FingerprintConfig,
        buffer: Vec<u8>,
        filled: usize,
        index: u64,
        offset: u64,
        finished: bool,
    }
}

impl<R> BlockStream<R> {
    /// Creates a block stream from an async reader.
    pub fn new(reader: R, config: FingerprintConfig) -> Self {
        Self {
            reader,
            config,
            buffer: vec![0u8; config.chunk_size().get()],
            filled: 0,
            index: 0,
            offset: 0,
            finished: false,
        }
    }
}

impl<R: AsyncRead> Stream for BlockStream<R> {
    type Item = Result<Block, EtagError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            if *this.filled == this.buffer.len() {
                return Poll::Ready(Some(Ok(emit_block(
                    this.buffer,
                    this.filled,
                    this.index,
                    this.offset,
                    this.config,
                ))));
            }

            let buf = &mut this.buffer[*this.filled..];
            match ready!(this.reader.as_mut().poll_read(cx, buf)) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Ok(0) => {
                    *this.finished = true;
                    if *this.filled == 0 {
                        return Poll::Ready(None);
                    }
                    return Poll::Ready(Some(Ok(emit_block(
                        this.buffer,
                        this.filled,
                        this.index,
                        this.offset,
                        this.config,
                    ))));
                }
                Ok(n) => {
                    *this.filled += n;
                    if this.config.read_mode() == ReadMode::SingleRead {
                        // A short read is the last block
                        if *this.filled < this.buffer.len() {
                            *this.finished = true;
                        }
                        return Poll::Ready(Some(Ok(emit_block(
                            this.buffer,
                            this.filled,
                            this.index,
                            this.offset,
                            this.config,
                        ))));
                    }
                }
            }
        }
    }
}

/// Hashes the filled part of the buffer and advances the position.
fn emit_block(
    buffer: &[u8],
    filled: &mut usize,
    index: &mut u64,
    offset: &mut u64,
    config: &FingerprintConfig,
) -> Block {
    let len = *filled;
    let bytes = &buffer[..len];
    let block = Block::new(*index, *offset, len, Md5Hasher::hash(bytes));
    let block = if config.keep_data() {
        block.set_data(Bytes::copy_from_slice(bytes))
    } else {
        block
    };

    trace!(
        part = block.part_number(),
        offset = block.offset,
        len,
        md5 = %block.digest,
        "hashed block"
    );

    *filled = 0;
    *index += 1;
    *offset += len as u64;
    block
}

pin_project! {
    /// Future returned by [`fingerprint_async`].
    #[must_use = "futures do nothing unless polled"]
    pub struct FingerprintFuture<R> {
        #[pin]
        stream: BlockStream<R>,
        composer: Composer,
        bytes: u64,
    }
}

impl<R: AsyncRead> Future for FingerprintFuture<R> {
    type Output = Result<CompositeFingerprint, EtagError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            match ready!(this.stream.as_mut().poll_next(cx)) {
                Some(Ok(block)) => {
                    *this.bytes += block.len as u64;
                    this.composer.push(&block.digest);
                }
                Some(Err(e)) => return Poll::Ready(Err(e)),
                None => {
                    let fp = std::mem::take(this.composer).finish();
                    debug!(
                        blocks = fp.blocks(),
                        bytes = *this.bytes,
                        fingerprint = %fp,
                        "computed composite fingerprint"
                    );
                    return Poll::Ready(Ok(fp));
                }
            }
        }
    }
}

/// Computes the composite fingerprint of an async reader.
///
/// Uses `futures_io::AsyncRead`, so any runtime works. Tokio readers can be
/// adapted with `tokio_util::compat::TokioAsyncReadCompatExt::compat`.
///
/// Produces the same fingerprint as the synchronous API for the same bytes
/// and configuration.
pub fn fingerprint_async<R: AsyncRead>(reader: R, config: FingerprintConfig) -> FingerprintFuture<R> {
    FingerprintFuture {
        stream: BlockStream::new(reader, config),
        composer: Composer::new(),
        bytes: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn config(size: usize) -> FingerprintConfig {
        FingerprintConfig::with_bytes(size).unwrap()
    }

    #[tokio::test]
    async fn test_block_stream_empty() {
        let reader: &[u8] = &[];
        let blocks: Vec<_> = BlockStream::new(reader, config(4)).collect().await;
        assert!(blocks.is_empty());
    }

    #[tokio::test]
    async fn test_block_stream_lengths() {
        let reader: &[u8] = b"AAAABBBBC";
        let blocks: Vec<_> = BlockStream::new(reader, config(4))
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let lens: Vec<usize> = blocks.iter().map(|b| b.len).collect();
        assert_eq!(lens, [4, 4, 1]);
        assert_eq!(blocks[2].offset, 8);
    }

    #[tokio::test]
    async fn test_fingerprint_async_example() {
        let reader: &[u8] = b"AAAABBBBC";
        let fp = fingerprint_async(reader, config(4)).await.unwrap();
        assert_eq!(fp.to_string(), "f066924e6930a631727fc89361c46cdc-3");
    }

    #[tokio::test]
    async fn test_fingerprint_async_exact_multiple() {
        let reader: &[u8] = b"AAAABBBB";
        let fp = fingerprint_async(reader, config(4).with_read_mode(ReadMode::FillBlock))
            .await
            .unwrap();
        assert_eq!(fp.to_string(), "5e63e8b777cb8ae2558cbb2fcfba9b95-2");
    }
}
