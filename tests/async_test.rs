// Integration tests for the async fingerprinting API
#![cfg(feature = "async-io")]

use std::io::{self, Cursor, Write};
use std::pin::Pin;
use std::task::{Context, Poll};

use etagrs::{BlockStream, ChunkSize, FingerprintConfig, ReadMode, fingerprint, fingerprint_async};
use futures_io::AsyncRead;
use futures_util::StreamExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 13) as u8).collect()
}

/// Async reader that yields one byte per ready poll and returns `Pending`
/// (after waking itself) on every other poll.
struct Trickle {
    data: Vec<u8>,
    pos: usize,
    pending: bool,
}

impl Trickle {
    fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            pending: true,
        }
    }
}

impl AsyncRead for Trickle {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        if self.pending {
            self.pending = false;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        self.pending = true;

        let n = (self.data.len() - self.pos).min(buf.len()).min(1);
        let pos = self.pos;
        buf[..n].copy_from_slice(&self.data[pos..pos + n]);
        self.pos += n;
        Poll::Ready(Ok(n))
    }
}

#[tokio::test]
async fn test_async_matches_sync() {
    let data = pattern(10_000);
    let config = FingerprintConfig::with_bytes(1024).unwrap();

    let reader: &[u8] = &data;
    let fp = fingerprint_async(reader, config).await.unwrap();
    let expected = fingerprint(Cursor::new(&data), config.chunk_size()).unwrap();
    assert_eq!(fp, expected);
    assert_eq!(fp.to_string(), "1f0317c6f18e81129e3b9110ea45abde-10");
}

#[tokio::test]
async fn test_async_empty() {
    let reader: &[u8] = &[];
    let fp = fingerprint_async(reader, FingerprintConfig::default()).await.unwrap();
    assert_eq!(fp.to_string(), "d41d8cd98f00b204e9800998ecf8427e-0");
}

#[tokio::test]
async fn test_async_tokio_file() {
    let data = pattern(70_000);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let chunk_size = ChunkSize::new(16 * 1024).unwrap();
    let config = FingerprintConfig::new(chunk_size).with_read_mode(ReadMode::FillBlock);
    let reader = tokio::fs::File::open(file.path()).await.unwrap();

    let fp = fingerprint_async(reader.compat(), config).await.unwrap();
    assert_eq!(fp, fingerprint(Cursor::new(&data), chunk_size).unwrap());
    assert_eq!(fp.blocks(), 5);
}

#[tokio::test]
async fn test_block_stream_keeps_data() {
    let reader: &[u8] = b"AAAABBBBC";
    let config = FingerprintConfig::with_bytes(4).unwrap().with_keep_data(true);

    let blocks: Vec<_> = BlockStream::new(reader, config)
        .map(|b| b.unwrap())
        .collect()
        .await;

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].data.as_deref(), Some(&b"AAAA"[..]));
    assert_eq!(blocks[2].data.as_deref(), Some(&b"C"[..]));
    assert_eq!(blocks[2].part_number(), 3);
}

#[tokio::test]
async fn test_async_fill_block_over_trickling_source() {
    let data = pattern(1000);
    let chunk_size = ChunkSize::new(64).unwrap();
    let expected = fingerprint(Cursor::new(&data), chunk_size).unwrap();

    let config = FingerprintConfig::new(chunk_size).with_read_mode(ReadMode::FillBlock);
    let fp = fingerprint_async(Trickle::new(&data), config).await.unwrap();
    assert_eq!(fp, expected);
    assert_eq!(fp.blocks(), 16);
}

#[tokio::test]
async fn test_async_single_read_stops_at_first_short_read() {
    let data = pattern(1000);
    let chunk_size = ChunkSize::new(64).unwrap();

    let config = FingerprintConfig::new(chunk_size).with_read_mode(ReadMode::SingleRead);
    let fp = fingerprint_async(Trickle::new(&data), config).await.unwrap();
    assert_eq!(fp.blocks(), 1);
    assert_eq!(fp, fingerprint(Cursor::new(&data[..1]), chunk_size).unwrap());
}

#[tokio::test]
async fn test_block_stream_accumulates_across_pending() {
    let config = FingerprintConfig::with_bytes(4)
        .unwrap()
        .with_read_mode(ReadMode::FillBlock)
        .with_keep_data(true);

    let blocks: Vec<_> = BlockStream::new(Trickle::new(b"AAAABBBBC"), config)
        .map(|b| b.unwrap())
        .collect()
        .await;

    let lens: Vec<usize> = blocks.iter().map(|b| b.len).collect();
    assert_eq!(lens, [4, 4, 1]);
    assert_eq!(blocks[1].data.as_deref(), Some(&b"BBBB"[..]));
    assert_eq!(blocks[2].offset, 8);
}
