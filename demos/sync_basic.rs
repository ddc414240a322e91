//! Basic synchronous blocking example with the push API.
//!
//! Run with:
//!     cargo run --example sync_basic

use blockrs::{BlockConfig, Blocker};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 100 KB of sample data, arriving in uneven pieces
    let data: Vec<u8> = (0..100_000).map(|i| (i % 256) as u8).collect();
    let config = BlockConfig::new(4096)?;
    let mut blocker = Blocker::new(config)?;

    println!("Blocking {} bytes into {}-byte blocks...\n", data.len(), config.size());

    let mut total_blocks = 0;
    for piece in data.chunks(3000) {
        for block in blocker.push(piece)? {
            let block = block?;
            total_blocks += 1;
            println!("{}", block);
        }
    }

    if let Some(last) = blocker.finish()? {
        total_blocks += 1;
        println!("{} <- {} bytes of padding", last, last.padding);
    }

    println!("\nTotal: {} blocks", total_blocks);
    Ok(())
}
