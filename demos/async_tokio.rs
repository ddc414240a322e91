//! Async blocking of a tokio file.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io -- /path/to/file

use blockrs::{BlockConfig, block_async};
use futures_util::StreamExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    let file = tokio::fs::File::open(&path).await?;
    let mut stream = block_async(file.compat(), BlockConfig::new(1024)?)?;

    let mut total_blocks = 0;
    let mut total_bytes = 0;
    while let Some(block) = stream.next().await {
        let block = block?;
        total_blocks += 1;
        total_bytes += block.len();
    }

    println!("{}: {} blocks, {} bytes written", path, total_blocks, total_bytes);
    Ok(())
}
