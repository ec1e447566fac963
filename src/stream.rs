//! Implementation of [`MergedStream`] and [`SortedStream`]

use core::{
    convert::Infallible,
    fmt, mem,
    pin::Pin,
    task::{Context, Poll},
};

use alloc::vec::Vec;
use futures_core::{FusedStream, Stream, TryStream};
use pin_project::pin_project;
use tracing::debug;

use crate::{
    comparators::TryComparator,
    engine::{Engine, SourceFault},
    error::MergeError,
};

/// Result yielded by a [`MergedStream`]
pub type MergeResult<S, C> = Result<
    <S as TryStream>::Ok,
    MergeError<<S as TryStream>::Error, <C as TryComparator<<S as TryStream>::Ok>>::Error>,
>;

/// A stream that yields the smallest buffered item across several ordered sources.
///
/// `MergedStream` is created by [`Merged::try_build`](crate::Merged::try_build). Each source
/// holds at most one item that hasn't been yielded yet, and an item is only yielded once
/// every active source holds one: a single slow source stalls the whole merge rather than
/// letting the others run ahead. A source is asked for its next item right after its
/// previous one was yielded.
///
/// Items that compare equal are yielded in the order their sources were given to the builder.
///
/// Dropping the stream drops every source.
///
/// # Errors
///
/// * A failing source ends the merge: all sources are dropped, the error is yielded
///   as [`MergeError::Source`] and the stream is terminated afterwards. Items yielded
///   before the failure stay yielded.
/// * A failing comparator yields [`MergeError::Comparator`] and consumes nothing,
///   polling again retries the same comparison.
///
/// # Examples
///
/// ```
/// use futures::{executor::block_on, stream::{self, TryStreamExt}};
/// use stream_merge::{Merged, MergeError};
///
/// let a = stream::iter(vec![Ok(1), Ok(3), Err("disconnected")]);
/// let b = stream::iter(vec![Ok(2), Ok(4)]);
///
/// let mut merged = Merged::new([a, b]).try_build();
/// let mut seen = Vec::new();
/// let err = block_on(async {
///     loop {
///         match merged.try_next().await {
///             Ok(Some(item)) => seen.push(item),
///             Ok(None) => unreachable!(),
///             Err(err) => break err,
///         }
///     }
/// });
/// assert_eq!(seen, [1, 2, 3]);
/// assert_eq!(err, MergeError::Source { index: 0, error: "disconnected" });
/// ```
pub struct MergedStream<S, C>
where
    S: TryStream,
{
    engine: Engine<S, S::Ok>,
    cmp: C,
    /// Fault met while refilling after a selection, yielded on the next poll
    fault: Option<SourceFault<S::Error>>,
    terminated: bool,
}

// Sources are boxed and nothing else is structurally pinned
impl<S: TryStream, C> Unpin for MergedStream<S, C> {}

impl<S, C> fmt::Debug for MergedStream<S, C>
where
    S: TryStream,
    S::Ok: fmt::Debug,
    S::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedStream")
            .field("engine", &self.engine)
            .field("fault", &self.fault)
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}

impl<S, C> MergedStream<S, C>
where
    S: TryStream,
    C: TryComparator<S::Ok>,
{
    pub(crate) fn new(streams: impl IntoIterator<Item = S>, cmp: C) -> Self {
        Self {
            engine: Engine::new(streams),
            cmp,
            fault: None,
            terminated: false,
        }
    }

    /// Number of sources that can still produce items.
    ///
    /// Sources that are already finished are only noticed once they are polled, so before
    /// the first poll this is the number of streams given to the builder.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    /// Returns `true` if no source can produce items anymore.
    pub fn is_empty(&self) -> bool {
        self.engine.len() == 0
    }

    /// Consumes the `MergedStream` and returns the remaining sources.
    ///
    /// Each element is `(buffered_item, stream)`, where `buffered_item` is an item already
    /// taken from `stream` but not yet yielded. Sources come in the order they were given
    /// to the builder; finished sources are missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::{executor::block_on, stream::{self, StreamExt}};
    /// use stream_merge::Merged;
    ///
    /// let mut merged = Merged::new([
    ///     stream::iter([Ok::<_, ()>(1), Ok(3)]),
    ///     stream::iter([Ok(2), Ok(4)]),
    /// ])
    /// .try_build();
    /// assert_eq!(block_on(merged.next()), Some(Ok(1)));
    ///
    /// let mut sources = merged.into_sources();
    /// assert_eq!(sources[0].0, Some(3));
    /// assert_eq!(sources[1].0, Some(2));
    /// assert_eq!(block_on(sources[1].1.next()), Some(Ok(4)));
    /// ```
    pub fn into_sources(mut self) -> Vec<(Option<S::Ok>, Pin<alloc::boxed::Box<S>>)> {
        mem::replace(&mut self.engine, Engine::new([]))
            .into_sources()
            .into_iter()
            .map(|source| (source.slot, source.stream))
            .collect()
    }

    /// Hint for a merge that can't fail: every item the sources report is yielded
    fn infallible_size_hint(&self) -> (usize, Option<usize>) {
        if self.terminated {
            (0, Some(0))
        } else {
            self.engine.size_hint()
        }
    }

    /// Drops every source, nothing is requested from them afterwards
    fn tear_down(&mut self, index: usize) {
        debug!(
            source = index,
            dropped = self.engine.len(),
            "source failed, tearing down merge"
        );
        self.engine.clear();
    }
}

impl<S, C> Stream for MergedStream<S, C>
where
    S: TryStream,
    C: TryComparator<S::Ok>,
{
    type Item = MergeResult<S, C>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.terminated {
            return Poll::Ready(None);
        }
        if let Some(SourceFault { index, error }) = this.fault.take() {
            this.terminated = true;
            return Poll::Ready(Some(Err(MergeError::Source { index, error })));
        }

        if let Err(SourceFault { index, error }) = this.engine.fill(cx) {
            this.tear_down(index);
            this.terminated = true;
            return Poll::Ready(Some(Err(MergeError::Source { index, error })));
        }
        if !this.engine.all_ready() {
            // every source with an empty slot has registered the waker
            return Poll::Pending;
        }

        match this.engine.pop_min(&this.cmp) {
            Ok(Some((pos, item))) => {
                if let Err(fault) = this.engine.refill(pos, cx) {
                    this.tear_down(fault.index);
                    this.fault = Some(fault);
                }
                Poll::Ready(Some(Ok(item)))
            }
            Ok(None) => {
                debug!("all sources exhausted");
                this.terminated = true;
                Poll::Ready(None)
            }
            Err(error) => {
                debug!(sources = this.engine.len(), "comparator failed");
                Poll::Ready(Some(Err(MergeError::Comparator(error))))
            }
        }
    }

    /// A source fault can cut the merge short and comparator faults can repeat without
    /// bound, so only one more item is promised and no upper bound is known while sources
    /// are left.
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.terminated {
            return (0, Some(0));
        }
        if self.fault.is_some() {
            // sources are already gone, the fault is all that's left
            return (1, Some(1));
        }
        if self.engine.len() == 0 {
            return (0, Some(0));
        }
        let (lower, _) = self.engine.size_hint();
        (lower.min(1), None)
    }
}

impl<S, C> FusedStream for MergedStream<S, C>
where
    S: TryStream,
    C: TryComparator<S::Ok>,
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<S, C> Drop for MergedStream<S, C>
where
    S: TryStream,
{
    fn drop(&mut self) {
        if !self.terminated && self.engine.len() > 0 {
            debug!(sources = self.engine.len(), "merge dropped before completion");
        }
    }
}

/// Presents an infallible stream as a [`TryStream`] so it can feed a [`MergedStream`]
#[pin_project]
#[derive(Debug)]
pub struct NeverFails<S>(#[pin] S);

impl<S: Stream> Stream for NeverFails<S> {
    type Item = Result<S::Item, Infallible>;

    #[inline]
    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().0.poll_next(cx).map(|item| item.map(Ok))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// A [`MergedStream`] over infallible sources with an infallible comparator, yielding
/// plain items.
///
/// Created by [`Merged::build`](crate::Merged::build) and the [`merge`](crate::merge)
/// family of functions. Behaves exactly like [`MergedStream`], minus the errors.
///
/// # Examples
///
/// ```
/// use futures::{executor::block_on, stream::{self, StreamExt}};
/// use stream_merge::Merged;
///
/// let merged = Merged::new([
///     stream::iter([1, 4, 7]),
///     stream::iter([2, 3, 9]),
///     stream::iter([5, 6, 8]),
/// ])
/// .build();
/// assert_eq!(block_on(merged.collect::<Vec<_>>()), [1, 2, 3, 4, 5, 6, 7, 8, 9]);
/// ```
#[pin_project]
pub struct SortedStream<S, C>
where
    S: Stream,
{
    #[pin]
    inner: MergedStream<NeverFails<S>, C>,
}

impl<S, C> fmt::Debug for SortedStream<S, C>
where
    S: Stream,
    S::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SortedStream").field(&self.inner).finish()
    }
}

impl<S, C> SortedStream<S, C>
where
    S: Stream,
    C: TryComparator<S::Item, Error = Infallible>,
{
    pub(crate) fn new(streams: impl IntoIterator<Item = S>, cmp: C) -> Self {
        Self {
            inner: MergedStream::new(streams.into_iter().map(NeverFails), cmp),
        }
    }

    /// Number of sources that can still produce items, see [`MergedStream::len`]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if no source can produce items anymore.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the underlying [`MergedStream`]
    pub fn into_inner(self) -> MergedStream<NeverFails<S>, C> {
        self.inner
    }
}

impl<S, C> Stream for SortedStream<S, C>
where
    S: Stream,
    C: TryComparator<S::Item, Error = Infallible>,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project()
            .inner
            .poll_next(cx)
            .map(|item| {
                item.map(|res| match res {
                    Ok(item) => item,
                    Err(err) => err.unreachable(),
                })
            })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.infallible_size_hint()
    }
}

impl<S, C> FusedStream for SortedStream<S, C>
where
    S: Stream,
    C: TryComparator<S::Item, Error = Infallible>,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}
