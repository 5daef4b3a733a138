#![no_main]

use std::io::{self, Cursor, Read};

use libfuzzer_sys::fuzz_target;
use etagrs::{FingerprintConfig, Fingerprinter, ReadMode};

/// Serves reads of varying length, driven by the fuzzer.
struct Jittery<'a> {
    data: Cursor<&'a [u8]>,
    steps: &'a [u8],
    call: usize,
}

impl Read for Jittery<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let step = self
            .steps
            .get(self.call % self.steps.len().max(1))
            .map_or(buf.len(), |&s| usize::from(s).max(1));
        self.call += 1;
        let n = step.min(buf.len());
        self.data.read(&mut buf[..n])
    }
}

fuzz_target!(|input: (u8, Vec<u8>, Vec<u8>)| {
    let (chunk, steps, data) = input;
    let chunk = usize::from(chunk).max(1);
    let config = FingerprintConfig::with_bytes(chunk).unwrap();

    let expected = Fingerprinter::new(config).fingerprint_bytes(&data);

    // Verify: full reads give the in-memory result in either mode
    for mode in [ReadMode::SingleRead, ReadMode::FillBlock] {
        let fp = Fingerprinter::new(config.with_read_mode(mode))
            .fingerprint(Cursor::new(&data))
            .unwrap();
        assert_eq!(fp, expected);
    }

    // Verify: FillBlock is independent of how reads are split
    let fp = Fingerprinter::new(config.with_read_mode(ReadMode::FillBlock))
        .fingerprint(Jittery {
            data: Cursor::new(data.as_slice()),
            steps: &steps,
            call: 0,
        })
        .unwrap();
    assert_eq!(fp, expected);
});
