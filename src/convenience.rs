#![allow(clippy::type_complexity)]
use core::cmp::Ordering;

use futures_core::{Stream, TryStream};

use crate::{
    comparators::{ByFunc, ByKey, ByOrd, TryByFunc},
    Merged, MergedStream, SortedStream,
};

/// Merges ordered streams with default parameters:
/// * Yields items according to their [`Ord`] implementation, smallest-first
/// * Equal items are yielded in order of their respective streams
pub fn merge<IT>(streams: IT) -> SortedStream<IT::Item, ByOrd>
where
    IT: IntoIterator,
    IT::Item: Stream,
    <IT::Item as Stream>::Item: Ord,
{
    Merged::new(streams).build()
}

/// Merges ordered streams:
/// * Yields smallest items according to `func`
/// * Equal items are yielded in order of their respective streams
pub fn merge_by<IT, F>(streams: IT, func: F) -> SortedStream<IT::Item, ByFunc<F>>
where
    IT: IntoIterator,
    IT::Item: Stream,
    F: Fn(&<IT::Item as Stream>::Item, &<IT::Item as Stream>::Item) -> Ordering,
{
    Merged::new(streams).with_cmp(func).build()
}

/// Merges ordered streams:
/// * Yields items with the smallest key according to `func` first
/// * Equal items are yielded in order of their respective streams
pub fn merge_by_key<IT, F, K>(streams: IT, func: F) -> SortedStream<IT::Item, ByKey<F>>
where
    IT: IntoIterator,
    IT::Item: Stream,
    F: Fn(&<IT::Item as Stream>::Item) -> K,
    K: Ord,
{
    Merged::new(streams).by_key(func).build()
}

/// Merges ordered fallible streams by their `Ok` values:
/// * Yields items according to their [`Ord`] implementation, smallest-first
/// * Equal items are yielded in order of their respective streams
/// * The first source error ends the merge
pub fn try_merge<IT>(streams: IT) -> MergedStream<IT::Item, ByOrd>
where
    IT: IntoIterator,
    IT::Item: TryStream,
    <IT::Item as TryStream>::Ok: Ord,
{
    Merged::new(streams).try_build()
}

/// Merges ordered fallible streams by their `Ok` values, comparing them with a fallible
/// `func`:
/// * Yields smallest items according to `func`
/// * Equal items are yielded in order of their respective streams
/// * The first source error ends the merge, comparator errors are yielded and retried
pub fn try_merge_by<IT, F, E>(streams: IT, func: F) -> MergedStream<IT::Item, TryByFunc<F>>
where
    IT: IntoIterator,
    IT::Item: TryStream,
    F: Fn(&<IT::Item as TryStream>::Ok, &<IT::Item as TryStream>::Ok) -> Result<Ordering, E>,
{
    Merged::new(streams).try_with_cmp(func).try_build()
}
