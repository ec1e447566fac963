//! Defines comparators for [`MergedStream`](crate::MergedStream)
//!
//! Users of this crate may implement [`Comparator`] to create a custom infallible comparator,
//! or [`TryComparator`] for one that can fail. Everything the merge engine consumes is a
//! [`TryComparator`]; infallible comparators provided here implement both traits, and a user's
//! own [`Comparator`] is lifted with [`Total`].
//!
//! Comparators can be chained by using [`Chain::new`].
//!
//! Ties are never broken by a comparator: when the comparator reports [`Ordering::Equal`] the
//! item from the source that was passed to the builder first is yielded first.

use core::{cmp::Ordering, convert::Infallible};

/// Trait used to compare elements of [`MergedStream`](crate::MergedStream)
///
/// Implementations should produce a consistent total ordering, see [`Ord`]
/// documentation for details.
///
/// Producing non-total or inconsistent ordering may result in items being yielded
/// in the wrong order, but never in lost or duplicated items.
pub trait Comparator<T> {
    /// Compares two elements and returns an [`Ordering`]
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, C> Comparator<T> for &C
where
    C: Comparator<T> + ?Sized,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        C::compare(self, a, b)
    }
}

/// Comparator that may fail.
///
/// A failed comparison aborts the current selection only: no item is consumed, and the
/// next poll of the merged stream compares the very same items again.
pub trait TryComparator<T> {
    /// Error produced by a failed comparison
    type Error;

    /// Compares two elements and returns an [`Ordering`], or the reason it couldn't.
    fn try_compare(&self, a: &T, b: &T) -> Result<Ordering, Self::Error>;
}

impl<T, C> TryComparator<T> for &C
where
    C: TryComparator<T> + ?Sized,
{
    type Error = C::Error;

    #[inline]
    fn try_compare(&self, a: &T, b: &T) -> Result<Ordering, Self::Error> {
        C::try_compare(self, a, b)
    }
}

/// Implements [`TryComparator`] with `Error = Infallible` for a [`Comparator`]
macro_rules! infallible_try_comparator {
    ($name:ident $(<$param:ident>)? where $($bounds:tt)*) => {
        impl<T, $($param)?> TryComparator<T> for $name $(<$param>)?
        where
            $($bounds)*
        {
            type Error = Infallible;

            #[inline]
            fn try_compare(&self, a: &T, b: &T) -> Result<Ordering, Infallible> {
                Ok(Comparator::compare(self, a, b))
            }
        }
    };
}

/// Wrapper that reverses a comparator.
///
/// The selector is min-first, so to get max-first we're just inverting the order
/// of operands passed to comparators.
#[derive(Debug, Clone, Copy)]
pub struct MaxFirst<C>(pub(crate) C);

impl<C> MaxFirst<C> {
    /// Reverses `comparator`
    #[inline]
    pub const fn new(comparator: C) -> Self {
        Self(comparator)
    }
}

impl<T, C> Comparator<T> for MaxFirst<C>
where
    C: Comparator<T>,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T, C> TryComparator<T> for MaxFirst<C>
where
    C: TryComparator<T>,
{
    type Error = C::Error;

    #[inline]
    fn try_compare(&self, a: &T, b: &T) -> Result<Ordering, Self::Error> {
        self.0.try_compare(b, a)
    }
}

/// Calls the second comparator if the first one returns [`Ordering::Equal`].
#[derive(Debug, Clone, Copy)]
pub struct Chain<C1, C2> {
    first: C1,
    next: C2,
}

impl<C1, C2> Chain<C1, C2> {
    /// If the first comparator returns [`Ordering::Equal`] - compare
    /// elements using `next`.
    ///
    /// Similar to [`Ordering::then_with`]
    #[inline]
    pub const fn new(first: C1, next: C2) -> Self {
        Self { first, next }
    }
}

impl<T, C1, C2> Comparator<T> for Chain<C1, C2>
where
    C1: Comparator<T>,
    C2: Comparator<T>,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        match self.first.compare(a, b) {
            Ordering::Equal => self.next.compare(a, b),
            other => other,
        }
    }
}

impl<T, C1, C2, E> TryComparator<T> for Chain<C1, C2>
where
    C1: TryComparator<T, Error = E>,
    C2: TryComparator<T, Error = E>,
{
    type Error = E;

    #[inline]
    fn try_compare(&self, a: &T, b: &T) -> Result<Ordering, E> {
        match self.first.try_compare(a, b)? {
            Ordering::Equal => self.next.try_compare(a, b),
            other => Ok(other),
        }
    }
}

/// Comparator that uses [`Ord`] to compare items, default for the [`Merged`](crate::Merged)
/// builder.
///
/// # Example
/// Max-first merge:
///
/// ```
/// use futures::{executor::block_on, stream::{self, StreamExt}};
/// use stream_merge::{Merged, comparators::ByOrd};
///
/// let merged = Merged::new([stream::iter([3, 2]), stream::iter([4, 1])])
///     .comparator(ByOrd)
///     .reversed()
///     .build();
/// assert_eq!(block_on(merged.collect::<Vec<_>>()), vec![4, 3, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ByOrd;

impl<T: Ord> Comparator<T> for ByOrd {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        Ord::cmp(a, b)
    }
}

infallible_try_comparator!(ByOrd where T: Ord);

/// Comparator that uses a function to compare items
///
/// Construct via [`Merged::with_cmp`](crate::Merged::with_cmp)
#[derive(Debug, Clone, Copy)]
pub struct ByFunc<F>(pub(crate) F);

impl<T, F> Comparator<T> for ByFunc<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    // Leaving decision to inline this to the compiler because F can be long
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0(a, b)
    }
}

infallible_try_comparator!(ByFunc<F> where F: Fn(&T, &T) -> Ordering);

/// Comparator that uses a key to compare items
///
/// Construct via [`Merged::by_key`](crate::Merged::by_key)
#[derive(Debug, Clone, Copy)]
pub struct ByKey<F>(pub(crate) F);

impl<T, F, K> Comparator<T> for ByKey<F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0(a).cmp(&self.0(b))
    }
}

impl<T, F, K> TryComparator<T> for ByKey<F>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    type Error = Infallible;

    #[inline]
    fn try_compare(&self, a: &T, b: &T) -> Result<Ordering, Infallible> {
        Ok(self.compare(a, b))
    }
}

/// Comparator that uses a fallible function to compare items
///
/// Construct via [`Merged::try_with_cmp`](crate::Merged::try_with_cmp)
#[derive(Debug, Clone, Copy)]
pub struct TryByFunc<F>(pub(crate) F);

impl<T, F, E> TryComparator<T> for TryByFunc<F>
where
    F: Fn(&T, &T) -> Result<Ordering, E>,
{
    type Error = E;

    fn try_compare(&self, a: &T, b: &T) -> Result<Ordering, E> {
        self.0(a, b)
    }
}

/// Lifts any [`Comparator`] into a [`TryComparator`] that never fails.
///
/// Construct via [`Merged::comparator`](crate::Merged::comparator)
#[derive(Debug, Clone, Copy)]
pub struct Total<C>(pub(crate) C);

impl<T, C> Comparator<T> for Total<C>
where
    C: Comparator<T>,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b)
    }
}

infallible_try_comparator!(Total<C> where C: Comparator<T>);
