// Integration tests for the Blocker streaming API
// Tests cover: push/finish semantics, padding policy, determinism, failure handling

use std::cell::RefCell;
use std::io::{self, Cursor};
use std::rc::Rc;

use blockrs::{
    BackingStore, Block, BlockConfig, BlockError, BlockOptions, Blocker, State, TempFileStore,
    block_bytes,
};
use proptest::prelude::*;

/// Pushes every chunk, drains fully after each, then finishes.
fn run<S: BackingStore>(mut blocker: Blocker<S>, chunks: &[&[u8]]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for chunk in chunks {
        for block in blocker.push(chunk).expect("push") {
            blocks.push(block.expect("block"));
        }
    }
    blocks.extend(blocker.finish().expect("finish"));
    blocks
}

fn blocker(size: usize, zero_padding: bool) -> Blocker {
    let config = BlockConfig::new(size)
        .unwrap()
        .with_zero_padding(zero_padding);
    Blocker::new(config).unwrap()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_input() {
    let blocks = run(blocker(512, true), &[]);
    assert!(blocks.is_empty(), "Empty input should produce no blocks");
}

#[test]
fn test_all_empty_chunks() {
    let blocks = run(blocker(512, true), &[b"", b"", b""]);
    assert!(
        blocks.is_empty(),
        "Empty chunks should produce no blocks, padded or not"
    );
}

#[test]
fn test_split_input_padded() {
    let blocks = run(blocker(4, true), &[b"ab", b"cde", b"f"]);

    assert_eq!(blocks.len(), 2);
    assert_eq!(&blocks[0].data[..], b"abcd");
    assert_eq!(&blocks[1].data[..], b"ef\0\0");
    assert_eq!(blocks[1].padding, 2);
}

#[test]
fn test_split_input_unpadded() {
    let blocks = run(blocker(4, false), &[b"ab", b"cde", b"f"]);

    assert_eq!(blocks.len(), 2);
    assert_eq!(&blocks[0].data[..], b"abcd");
    assert_eq!(&blocks[1].data[..], b"ef");
    assert_eq!(blocks[1].padding, 0);
}

#[test]
fn test_exact_multiple_single_chunk() {
    for zero_padding in [true, false] {
        let blocks = run(blocker(3, zero_padding), &[b"abcdefghi"]);
        let data: Vec<&[u8]> = blocks.iter().map(|b| &b.data[..]).collect();
        assert_eq!(
            data,
            vec![&b"abc"[..], b"def", b"ghi"],
            "No trailing block for exact multiples"
        );
    }
}

#[test]
fn test_default_size_from_options() {
    let config = BlockOptions::new().into_config().unwrap();
    let blocks = run(Blocker::new(config).unwrap(), &[&[7u8; 600]]);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].len(), 512);
    assert_eq!(blocks[1].len(), 512);
    assert_eq!(blocks[1].payload().len(), 88);
}

#[test]
fn test_nopad_option() {
    let config = BlockOptions::new().size(4).nopad(true).into_config().unwrap();
    let blocks = run(Blocker::new(config).unwrap(), &[b"abcdef"]);
    assert_eq!(&blocks[1].data[..], b"ef");
}

// ============================================================================
// Streaming and Backpressure Semantics
// ============================================================================

#[test]
fn test_each_push_drains_all_complete_blocks() {
    let mut blocker = blocker(4, true);

    let first: Vec<_> = blocker.push(b"abc").unwrap().collect();
    assert!(first.is_empty());
    assert_eq!(blocker.buffered(), 3);

    let second: Vec<_> = blocker.push(b"defghijkl").unwrap().collect();
    assert_eq!(second.len(), 3);
    assert_eq!(blocker.buffered(), 0);
    assert_eq!(blocker.position(), 12);
    assert_eq!(blocker.state(), State::AwaitingInput);
}

#[test]
fn test_abandoned_drain_blocks_further_input() {
    let mut blocker = blocker(2, true);
    drop(blocker.push(b"abcd").unwrap());

    for _ in 0..100 {
        let err = blocker.push(b"xxxxxxxx").map(|_| ()).unwrap_err();
        assert!(matches!(err, BlockError::Undrained { pending: 4, size: 2 }));
    }
    assert_eq!(blocker.buffered(), 4, "Rejected pushes must not buffer");

    let mut blocks: Vec<Block> = blocker.drain().collect::<Result<_, _>>().unwrap();
    assert_eq!(blocker.state(), State::AwaitingInput);
    blocks.extend(run(blocker, &[b"e"]));
    let data: Vec<&[u8]> = blocks.iter().map(|b| &b.data[..]).collect();
    assert_eq!(data, vec![&b"ab"[..], b"cd", b"e\0"]);
}

#[test]
fn test_blocks_one_byte_at_a_time() {
    let data: Vec<u8> = (0..100).collect();
    let bytes: Vec<&[u8]> = data.chunks(1).collect();
    let blocks = run(blocker(10, true), &bytes);

    assert_eq!(blocks.len(), 10);
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.offset, (i * 10) as u64);
        assert_eq!(&block.data[..], &data[i * 10..(i + 1) * 10]);
    }
}

#[test]
fn test_many_flush_cycles_preserve_data() {
    // Several pushes, each leaving a remainder behind, over a file store.
    let data: Vec<u8> = (0..10_000u32).map(|i| (i * 31 % 251) as u8).collect();
    let chunks: Vec<&[u8]> = data.chunks(777).collect();
    let blocks = run(blocker(512, false), &chunks);

    let joined: Vec<u8> = blocks.iter().flat_map(|b| b.data.to_vec()).collect();
    assert_eq!(joined, data, "Re-blocked output must equal input");
}

#[test]
fn test_blocks_iterator_matches_push_api() {
    let data: Vec<u8> = (0..5000u32).map(|i| (i % 256) as u8).collect();

    let pushed = run(blocker(300, true), &[&data]);
    let pulled = blocker(300, true)
        .blocks(Cursor::new(&data))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(pushed, pulled);
}

// ============================================================================
// Resource Lifecycle
// ============================================================================

#[test]
fn test_temp_file_removed_after_finish() {
    let dir = tempfile::tempdir().unwrap();
    let store = TempFileStore::new_in(dir.path()).unwrap();
    let config = BlockConfig::new(4).unwrap();
    let blocks = run(Blocker::with_store(config, store).unwrap(), &[b"abcdef"]);

    assert_eq!(blocks.len(), 2);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_temp_file_removed_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = TempFileStore::new_in(dir.path()).unwrap();
        let mut blocker = Blocker::with_store(BlockConfig::new(4).unwrap(), store).unwrap();
        let _ = blocker.push(b"abcdef").unwrap().next();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ============================================================================
// Failure Handling
// ============================================================================

/// Store that records every call and fails reads past a byte budget.
#[derive(Default)]
struct Recorder {
    data: Vec<u8>,
    read_budget: Option<usize>,
    log: Rc<RefCell<Vec<String>>>,
}

impl BackingStore for Recorder {
    fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        self.log
            .borrow_mut()
            .push(format!("write {}+{}", offset, data.len()));
        let end = offset as usize + data.len();
        self.data.resize(self.data.len().max(end), 0);
        self.data[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(budget) = self.read_budget.as_mut() {
            if *budget < buf.len() {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "budget"));
            }
            *budget -= buf.len();
        }
        let start = (offset as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn release(&mut self) -> io::Result<()> {
        self.log.borrow_mut().push("release".to_string());
        Ok(())
    }
}

#[test]
fn test_writes_are_sequential_at_total_offset() {
    let store = Recorder::default();
    let log = Rc::clone(&store.log);
    let config = BlockConfig::new(4).unwrap();
    run(
        Blocker::with_store(config, store).unwrap(),
        &[b"abcde", b"fgh", b"ij"],
    );

    assert_eq!(
        *log.borrow(),
        vec!["write 0+5", "write 5+3", "write 8+2", "release"]
    );
}

#[test]
fn test_read_failure_mid_stream_is_terminal() {
    let store = Recorder {
        read_budget: Some(4),
        ..Default::default()
    };
    let log = Rc::clone(&store.log);
    let mut blocker = Blocker::with_store(BlockConfig::new(4).unwrap(), store).unwrap();

    let results: Vec<_> = blocker.push(b"abcdefghijkl").unwrap().collect();
    assert_eq!(results.len(), 2, "One block, then the error");
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(BlockError::Io(_))));

    assert_eq!(blocker.state(), State::Terminated);
    assert!(matches!(blocker.push(b"m"), Err(BlockError::Terminated)));
    assert_eq!(log.borrow().last().map(String::as_str), Some("release"));
}

#[test]
fn test_invalid_size_rejected_at_construction() {
    assert!(matches!(
        BlockConfig::new(0),
        Err(BlockError::InvalidConfig { .. })
    ));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_determinism_across_push_sizes() {
    let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 + 13) as u8).collect();
    let reference = block_bytes(BlockConfig::new(100).unwrap(), &data).unwrap();

    for step in [1, 3, 64, 100, 101, 4096] {
        let chunks: Vec<&[u8]> = data.chunks(step).collect();
        let blocks = run(blocker(100, true), &chunks);
        assert_eq!(blocks, reference, "Push size {} changed the output", step);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn split(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = cuts.iter().map(|c| c % (data.len() + 1)).collect();
    cuts.sort_unstable();
    let mut parts = Vec::new();
    let mut start = 0;
    for cut in cuts {
        parts.push(data[start..cut].to_vec());
        start = cut;
    }
    parts.push(data[start..].to_vec());
    parts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_reassembly_and_sizing(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
        cuts in proptest::collection::vec(any::<usize>(), 0..8),
        size in 1usize..300,
        zero_padding in any::<bool>(),
    ) {
        let parts = split(&data, &cuts);
        let refs: Vec<&[u8]> = parts.iter().map(Vec::as_slice).collect();
        let blocks = run(blocker(size, zero_padding), &refs);

        let full = data.len() / size;
        let rem = data.len() % size;
        prop_assert_eq!(blocks.len(), full + usize::from(rem != 0));

        for block in &blocks[..full] {
            prop_assert_eq!(block.len(), size);
            prop_assert_eq!(block.padding, 0);
        }

        if rem != 0 {
            let last = blocks.last().unwrap();
            prop_assert!(last.is_final());
            if zero_padding {
                prop_assert_eq!(last.len(), size);
                prop_assert!(last.data[rem..].iter().all(|&b| b == 0));
            } else {
                prop_assert_eq!(last.len(), rem);
            }
            prop_assert_eq!(&last.data[..rem], &data[data.len() - rem..]);
        }

        let joined: Vec<u8> = blocks.iter().flat_map(|b| b.payload().to_vec()).collect();
        prop_assert_eq!(joined, data);
    }
}
