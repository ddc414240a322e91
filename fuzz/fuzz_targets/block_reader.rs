#![no_main]

use std::io::Cursor;

use blockrs::{BlockConfig, Blocker, HashConfig, block_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<u8>| {
    let configs = [
        BlockConfig::new(1).unwrap(),
        BlockConfig::new(7).unwrap().with_zero_padding(false),
        BlockConfig::default(),
        BlockConfig::new(4096).unwrap(),
    ];

    for config in configs {
        let pulled = Blocker::new(config)
            .unwrap()
            .blocks(Cursor::new(&data))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        // Verify: reader and one-shot paths agree
        let pushed = block_bytes(config, &data).unwrap();
        assert_eq!(pulled, pushed);

        let total: usize = pulled.iter().map(|b| b.len() - b.padding).sum();
        assert_eq!(total, data.len());
    }

    // Verify: same content produces same hashes
    let config = BlockConfig::new(64).unwrap().with_hash_config(HashConfig::enabled());
    let a = block_bytes(config, &data).unwrap();
    let b = block_bytes(config, &data).unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert!(x.hash.is_some());
        assert_eq!(x.hash, y.hash);
    }
});
