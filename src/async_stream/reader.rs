//! Async stream adapter over `AsyncRead`.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;

use crate::block::Block;
use crate::config::BlockConfig;
use crate::error::BlockError;
use crate::slicer::{Blocker, DEFAULT_READ_SIZE};
use crate::store::{BackingStore, TempFileStore};

pin_project! {
    /// A stream that yields blocks from an async reader.
    ///
    /// This uses `futures_io::AsyncRead` which is runtime-agnostic.
    /// Store reads and writes are synchronous; each one touches at most
    /// one block or one input read.
    pub struct BlockStream<R, S: BackingStore> {
        #[pin]
        reader: R,
        blocker: Option<Blocker<S>>,
        read_buf: Vec<u8>,
    }
}

impl<R, S: BackingStore> BlockStream<R, S> {
    /// Creates a stream over `reader` using an existing session.
    pub fn new(reader: R, blocker: Blocker<S>) -> Self {
        Self {
            reader,
            blocker: Some(blocker),
            read_buf: vec![0u8; DEFAULT_READ_SIZE],
        }
    }
}

impl<R: AsyncRead, S: BackingStore> Stream for BlockStream<R, S> {
    type Item = Result<Block, BlockError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            let Some(blocker) = this.blocker.as_mut() else {
                return Poll::Ready(None);
            };

            let buffered = blocker.drain().next();
            if let Some(result) = buffered {
                if result.is_err() {
                    *this.blocker = None;
                }
                return Poll::Ready(Some(result));
            }

            let n = match this.reader.as_mut().poll_read(cx, &mut this.read_buf[..]) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Poll::Ready(Err(e)) => {
                    *this.blocker = None;
                    return Poll::Ready(Some(Err(BlockError::Io(e))));
                }
                Poll::Ready(Ok(n)) => n,
            };

            if n == 0 {
                return match this.blocker.take() {
                    Some(blocker) => Poll::Ready(blocker.finish().transpose()),
                    None => Poll::Ready(None),
                };
            }

            let pushed = blocker.push(&this.read_buf[..n]).map(|_| ());
            if let Err(e) = pushed {
                *this.blocker = None;
                return Poll::Ready(Some(Err(e)));
            }
        }
    }
}

/// Creates a block stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O. Fails only
/// if the config is invalid or the temporary file cannot be created.
///
/// # Runtime Compatibility
///
/// For tokio users, `tokio_util::compat` converts `tokio::io::AsyncRead`
/// to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use blockrs::{block_async, BlockConfig};
///
/// let tokio_reader = tokio::fs::File::open("file").await?;
/// let stream = block_async(tokio_reader.compat(), BlockConfig::default())?;
/// ```
pub fn block_async<R: AsyncRead>(
    reader: R,
    config: BlockConfig,
) -> Result<BlockStream<R, TempFileStore>, BlockError> {
    Ok(BlockStream::new(reader, Blocker::new(config)?))
}
