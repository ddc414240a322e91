//! File blocking example.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/file [block-size] [--nopad]

use std::env;
use std::fs::File;

use blockrs::{BlockOptions, Blocker, HashConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let path = args.first().cloned().unwrap_or_else(|| "Cargo.toml".to_string());
    let size = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
    let nopad = args.iter().any(|a| a == "--nopad");

    let config = BlockOptions::new()
        .size(size)
        .nopad(nopad)
        .into_config()?
        .with_hash_config(HashConfig::enabled());

    println!("Blocking file: {} (block size {})\n", path, config.size());

    let file = File::open(&path)?;
    let mut total_blocks = 0;
    for block in Blocker::new(config)?.blocks(file) {
        let block = block?;
        total_blocks += 1;
        let hash = block.hash.map(|h| h.to_hex()).unwrap_or_default();
        println!(
            "Block {:>6}: offset={:>10}, len={:>6}, padding={:>6}, hash={}",
            total_blocks,
            block.offset,
            block.len(),
            block.padding,
            hash
        );
    }

    println!("\nTotal: {} blocks", total_blocks);
    Ok(())
}
