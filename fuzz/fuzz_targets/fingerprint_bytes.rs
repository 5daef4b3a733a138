#![no_main]

use libfuzzer_sys::fuzz_target;
use etagrs::{CompositeFingerprint, FingerprintConfig, Fingerprinter};

fuzz_target!(|input: (u16, Vec<u8>)| {
    let (chunk, data) = input;
    let chunk = usize::from(chunk).max(1);
    let fingerprinter = Fingerprinter::new(
        FingerprintConfig::with_bytes(chunk).unwrap().with_keep_data(true),
    );

    let blocks = fingerprinter.blocks_from_bytes(data.clone());

    // Verify: block count matches ceil(len / chunk)
    assert_eq!(blocks.len(), data.len().div_ceil(chunk));

    // Verify: blocks tile the input exactly
    let mut expected_offset = 0u64;
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.offset, expected_offset);
        assert!(block.len <= chunk);
        if i + 1 < blocks.len() {
            assert_eq!(block.len, chunk);
        }
        assert!(!block.is_empty());
        expected_offset += block.len as u64;
    }
    assert_eq!(expected_offset, data.len() as u64);

    // Verify: rendered fingerprint parses back
    let fp = fingerprinter.fingerprint_bytes(&data);
    assert_eq!(fp.blocks(), blocks.len() as u64);
    let parsed: CompositeFingerprint = fp.to_string().parse().unwrap();
    assert_eq!(parsed, fp);
});
