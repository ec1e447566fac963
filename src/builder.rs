use core::{cmp::Ordering, convert::Infallible};

use futures_core::{Stream, TryStream};

use crate::{
    comparators::{ByFunc, ByKey, ByOrd, MaxFirst, Total, TryByFunc, TryComparator},
    MergedStream, SortedStream,
};

/// A builder for creating a merged stream.
///
/// The `Merged` type provides an interface for configuring and creating [`SortedStream`]
/// and [`MergedStream`] streams. It allows you to specify how items are compared; ties are
/// always broken in favor of the stream that comes first in the collection given to
/// [`Merged::new`].
///
/// All input streams must already be ordered by the comparator the merge is built with.
/// Only the next item of each stream is ever looked at, so unordered input produces
/// unordered output.
///
/// # Examples
///
/// ```
/// use futures::{executor::block_on, stream::{self, StreamExt}};
/// use stream_merge::Merged;
///
/// let merged = Merged::new([stream::iter(vec![1, 3, 5]), stream::iter(vec![2, 4, 6])]).build();
/// assert_eq!(block_on(merged.collect::<Vec<_>>()), [1, 2, 3, 4, 5, 6]);
/// ```
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until `build` or `try_build` is called"]
pub struct Merged<Streams, Cmp> {
    pub(crate) streams: Streams,
    pub(crate) cmp: Cmp,
}

impl<Streams> Merged<Streams, ByOrd>
where
    Streams: IntoIterator,
{
    /// Creates a new [`Merged`] for merging streams.
    ///
    /// This is the entry point for creating a merged stream. By default, it compares items
    /// with [`Ord::cmp`] and yields the smallest first.
    ///
    /// # Arguments
    ///
    /// * `streams` - An ordered collection of streams to merge. The position of a stream in
    ///   this collection decides which of two equal items is yielded first, and is reported
    ///   in [`MergeError::Source`](crate::MergeError::Source) when the stream fails.
    pub const fn new(streams: Streams) -> Self {
        Merged {
            streams,
            cmp: ByOrd,
        }
    }
}

impl<Streams, Cmp> Merged<Streams, Cmp>
where
    Streams: IntoIterator,
{
    /// Sets a custom comparator for merging.
    ///
    /// Use [`Merged::comparator`] for a [`Comparator`](crate::comparators::Comparator) that
    /// can't fail, this one takes a [`TryComparator`] as is.
    pub fn try_comparator<C>(self, cmp: C) -> Merged<Streams, C> {
        let Self { streams, .. } = self;
        Merged { streams, cmp }
    }

    /// Sets a custom infallible comparator for merging.
    pub fn comparator<C>(self, cmp: C) -> Merged<Streams, Total<C>> {
        self.try_comparator(Total(cmp))
    }

    /// Sets a custom comparison function for merging.
    ///
    /// # Arguments
    ///
    /// * `cmp` - A function or closure that compares two items and returns an [`Ordering`].
    ///   The function should be consistent and transitive for proper merge behavior.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::{executor::block_on, stream::{self, StreamExt}};
    /// use stream_merge::Merged;
    ///
    /// // Case-insensitive ordering
    /// let merged = Merged::new([
    ///     stream::iter(vec!["Apple", "banana"]),
    ///     stream::iter(vec!["Cherry", "date"]),
    /// ])
    /// .with_cmp(|a: &&str, b: &&str| a.to_lowercase().cmp(&b.to_lowercase()))
    /// .build();
    /// let result: Vec<_> = block_on(merged.collect());
    /// assert_eq!(result, ["Apple", "banana", "Cherry", "date"]);
    /// ```
    pub fn with_cmp<T, F>(self, cmp: F) -> Merged<Streams, ByFunc<F>>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.try_comparator(ByFunc(cmp))
    }

    /// Compares items by the key `func` extracts from them.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::{executor::block_on, stream::{self, StreamExt}};
    /// use stream_merge::Merged;
    ///
    /// let merged = Merged::new([stream::iter(vec![-1_i32, 3]), stream::iter(vec![2, -4])])
    ///     .by_key(|v: &i32| v.abs())
    ///     .build();
    /// let result: Vec<_> = block_on(merged.collect());
    /// assert_eq!(result, [-1, 2, 3, -4]);
    /// ```
    pub fn by_key<T, F, K>(self, func: F) -> Merged<Streams, ByKey<F>>
    where
        F: Fn(&T) -> K,
        K: Ord,
    {
        self.try_comparator(ByKey(func))
    }

    /// Sets a comparison function that may fail.
    ///
    /// A failed comparison is yielded as [`MergeError::Comparator`](crate::MergeError::Comparator)
    /// by the stream built with [`Merged::try_build`]; nothing is consumed from the sources
    /// and polling again compares the same items anew.
    pub fn try_with_cmp<T, F, E>(self, cmp: F) -> Merged<Streams, TryByFunc<F>>
    where
        F: Fn(&T, &T) -> Result<Ordering, E>,
    {
        self.try_comparator(TryByFunc(cmp))
    }

    /// Yields the largest item first instead of the smallest.
    ///
    /// Equal items are still yielded in the order of their streams.
    pub fn reversed(self) -> Merged<Streams, MaxFirst<Cmp>> {
        let Self { streams, cmp } = self;
        Merged {
            streams,
            cmp: MaxFirst(cmp),
        }
    }
}

impl<Streams, Cmp> Merged<Streams, Cmp>
where
    Streams: IntoIterator,
    Streams::Item: Stream,
    Cmp: TryComparator<<Streams::Item as Stream>::Item, Error = Infallible>,
{
    /// Builds a merged stream over infallible streams, yielding plain items.
    ///
    /// Getting a compiler error about unsatisfied trait bounds here means that either the
    /// comparator can fail (use [`Merged::try_build`]) or the items don't implement [`Ord`]
    /// and no other comparator was set.
    pub fn build(self) -> SortedStream<Streams::Item, Cmp> {
        let Self { streams, cmp } = self;
        SortedStream::new(streams, cmp)
    }
}

impl<Streams, Cmp> Merged<Streams, Cmp>
where
    Streams: IntoIterator,
    Streams::Item: TryStream,
    Cmp: TryComparator<<Streams::Item as TryStream>::Ok>,
{
    /// Builds a merged stream over fallible streams.
    ///
    /// Streams yielding `Result<T, E>` are merged by their `Ok` values; see [`MergedStream`]
    /// for how source and comparator errors are reported.
    pub fn try_build(self) -> MergedStream<Streams::Item, Cmp> {
        let Self { streams, cmp } = self;
        MergedStream::new(streams, cmp)
    }
}
