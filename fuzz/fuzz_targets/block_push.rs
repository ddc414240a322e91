#![no_main]

use blockrs::{BlockConfig, Blocker};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, bool, Vec<u16>, Vec<u8>)| {
    let (size, zero_padding, cuts, data) = input;
    let size = usize::from(size).max(1);
    let config = BlockConfig::new(size).unwrap().with_zero_padding(zero_padding);

    // Split data at fuzzer-chosen points
    let mut cuts: Vec<usize> = cuts
        .into_iter()
        .map(|c| usize::from(c) % (data.len() + 1))
        .collect();
    cuts.sort_unstable();

    let mut blocker = Blocker::new(config).unwrap();
    let mut blocks = Vec::new();
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(data.len())) {
        for block in blocker.push(&data[start..cut]).unwrap() {
            blocks.push(block.unwrap());
        }
        start = cut;
    }
    blocks.extend(blocker.finish().unwrap());

    // Verify: every non-final block is full size, offsets are contiguous
    let mut expected_offset = 0u64;
    for block in &blocks {
        if !block.is_final() {
            assert_eq!(block.len(), size);
        }
        assert_eq!(block.offset, expected_offset);
        expected_offset += (block.len() - block.padding) as u64;
    }

    // Verify: payload reassembles the input
    let joined: Vec<u8> = blocks.iter().flat_map(|b| b.payload().to_vec()).collect();
    assert_eq!(joined, data);

    // Verify: padded tail is zero-filled up to size
    if let Some(last) = blocks.last().filter(|b| b.is_final()) {
        if zero_padding {
            assert_eq!(last.len(), size);
            assert!(last.data[last.len() - last.padding..].iter().all(|&b| b == 0));
        } else {
            assert_eq!(last.padding, 0);
        }
    }
});
