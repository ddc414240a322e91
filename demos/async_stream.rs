//! Re-blocking a stream of network-sized pieces.
//!
//! Run with:
//!     cargo run --example async_stream --features async-io

use std::io;
use std::time::Duration;

use blockrs::{BlockConfig, rechunk};
use futures_util::{StreamExt, stream};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simulate packets of varying size arriving over time
    let packets = stream::iter(0..40u32).then(|i| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        let len = 100 + (i as usize * 37) % 1400;
        Ok::<_, io::Error>(vec![i as u8; len])
    });

    let config = BlockConfig::new(4096)?.with_zero_padding(false);
    let mut blocks = rechunk(Box::pin(packets), config)?;

    while let Some(block) = blocks.next().await {
        let block = block?;
        println!(
            "Block @ {:>8}: {:>5} bytes{}",
            block.offset,
            block.len(),
            if block.is_final() { " (final)" } else { "" }
        );
    }

    Ok(())
}
