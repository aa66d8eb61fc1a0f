use std::{
    collections::VecDeque,
    pin::Pin,
    task::{Context, Poll},
};

use futures_core::{FusedStream, Stream};

use crate::decoder::RecordDecoder;
use crate::materialize::RecordMaterializer;

/// Lazily decodes a chunked byte source into items.
///
/// A chunk is only requested once every item from the previous chunk has been handed out, so
/// the consumer controls the pace. The source is dropped as soon as it ends or fails, and
/// dropping the stream drops it too, releasing whatever connection backs it.
///
/// A source error is yielded once as the final item; nothing follows it.
pub struct DecodeStream<S, M: RecordMaterializer> {
    source: Option<S>,
    decoder: RecordDecoder<M>,
    ready: VecDeque<M::Item>,
}

impl<S, M: RecordMaterializer> DecodeStream<S, M> {
    pub fn new(source: S, decoder: RecordDecoder<M>) -> Self {
        Self {
            source: Some(source),
            decoder,
            ready: VecDeque::new(),
        }
    }
}

impl<S: Unpin, M: RecordMaterializer> Unpin for DecodeStream<S, M> {}

impl<S, C, E, M> Stream for DecodeStream<S, M>
where
    S: Stream<Item = Result<C, E>> + Unpin,
    C: AsRef<[u8]>,
    M: RecordMaterializer,
{
    type Item = Result<M::Item, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(item) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(item)));
            }

            let Some(source) = this.source.as_mut() else {
                return Poll::Ready(None);
            };

            match Pin::new(source).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    let items = this.decoder.feed(chunk.as_ref());
                    this.ready.extend(items);
                }
                Poll::Ready(Some(Err(err))) => {
                    this.source = None;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    this.source = None;
                    let items = this.decoder.finish();
                    this.ready.extend(items);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S, C, E, M> FusedStream for DecodeStream<S, M>
where
    S: Stream<Item = Result<C, E>> + Unpin,
    C: AsRef<[u8]>,
    M: RecordMaterializer,
{
    fn is_terminated(&self) -> bool {
        self.source.is_none() && self.ready.is_empty()
    }
}
