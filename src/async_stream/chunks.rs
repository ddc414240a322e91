//! Async stream adapter over a stream of input chunks.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use pin_project_lite::pin_project;

use crate::block::Block;
use crate::config::BlockConfig;
use crate::error::BlockError;
use crate::slicer::Blocker;
use crate::store::{BackingStore, TempFileStore};

pin_project! {
    /// A stream that re-blocks a stream of byte chunks.
    ///
    /// Each input item is appended as one unit; the next item is only
    /// polled once every complete block has been yielded.
    pub struct Rechunk<St, S: BackingStore> {
        #[pin]
        input: St,
        blocker: Option<Blocker<S>>,
    }
}

impl<St, S: BackingStore> Rechunk<St, S> {
    /// Creates a re-blocking stream using an existing session.
    pub fn new(input: St, blocker: Blocker<S>) -> Self {
        Self {
            input,
            blocker: Some(blocker),
        }
    }
}

impl<St, B, S> Stream for Rechunk<St, S>
where
    St: Stream<Item = io::Result<B>>,
    B: AsRef<[u8]>,
    S: BackingStore,
{
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

            let chunk = match this.input.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => chunk,
                Poll::Ready(Some(Err(e))) => {
                    *this.blocker = None;
                    return Poll::Ready(Some(Err(BlockError::Io(e))));
                }
                Poll::Ready(None) => {
                    return match this.blocker.take() {
                        Some(blocker) => Poll::Ready(blocker.finish().transpose()),
                        None => Poll::Ready(None),
                    };
                }
            };

            let pushed = blocker.push(chunk.as_ref()).map(|_| ());
            if let Err(e) = pushed {
                *this.blocker = None;
                return Poll::Ready(Some(Err(e)));
            }
        }
    }
}

/// Re-blocks a stream of input chunks into fixed-size blocks.
///
/// # Example
///
/// ```ignore
/// use blockrs::{rechunk, BlockConfig};
/// use futures_util::{stream, StreamExt};
///
/// let input = stream::iter(vec![Ok(b"ab".to_vec()), Ok(b"cde".to_vec()), Ok(b"f".to_vec())]);
/// let blocks: Vec<_> = rechunk(input, BlockConfig::new(4)?)?.collect().await;
/// ```
pub fn rechunk<St, B>(
    input: St,
    config: BlockConfig,
) -> Result<Rechunk<St, TempFileStore>, BlockError>
where
    St: Stream<Item = io::Result<B>>,
    B: AsRef<[u8]>,
{
    Ok(Rechunk::new(input, Blocker::new(config)?))
}
