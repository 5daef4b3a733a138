//! Block-sized reads from a source.

use std::io::{self, Read};

use crate::config::ReadMode;

/// Reads the next block into `buf` and returns how many bytes it holds.
///
/// A return value below `buf.len()` means the source is exhausted (in
/// [`ReadMode::SingleRead`] a short read is taken to mean exactly that).
/// `Interrupted` is retried; any other error is returned as-is.
pub(crate) fn read_block<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    mode: ReadMode,
) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                if mode == ReadMode::SingleRead {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
