//! Ordered merging of async streams with backpressure.
//!
//! This crate provides [`MergedStream`], [`SortedStream`] and a builder API to merge items
//! from many ordered [`Stream`](futures_core::Stream)s according to a comparator. By default,
//! it performs a min-merge by [`Ord`], breaking ties by the order the streams were given in.
//! It's `no_std`, but needs `alloc`.
//!
//! # Quick start
//!
//! ```
//! use futures::{executor::block_on, stream::{self, StreamExt}};
//! use stream_merge::merge;
//!
//! let a = stream::iter(vec![1, 3, 5]);
//! let b = stream::iter(vec![2, 4, 6]);
//! let merged: Vec<_> = block_on(merge([a, b]).collect());
//! assert_eq!(merged, vec![1, 2, 3, 4, 5, 6]);
//! ```
//!
//! Note that only the next item of each stream is considered.
//! If the input streams are not sorted, the result won't be sorted either:
//!
//! ```
//! use futures::{executor::block_on, stream::{self, StreamExt}};
//! use stream_merge::merge;
//!
//! let merged: Vec<_> =
//!     block_on(merge([stream::iter(vec![2, 1, 5]), stream::iter(vec![4, 3, 6])]).collect());
//! assert_eq!(merged, vec![2, 1, 4, 3, 5, 6]);
//! ```
//!
//! # Backpressure
//!
//! Each stream has a buffer of exactly one item. An item is yielded only when every stream
//! that hasn't finished holds one, so a stream that has nothing ready stalls the merge
//! instead of letting its siblings run ahead, and a stream is asked for its next item only
//! after its previous one was yielded. Consumers that stop polling stop the sources too.
//!
//! ```
//! use futures::{channel::mpsc, executor::block_on, FutureExt, StreamExt};
//! use stream_merge::merge;
//!
//! let (tx_a, rx_a) = mpsc::unbounded();
//! let (tx_b, rx_b) = mpsc::unbounded();
//! let mut merged = merge([rx_a, rx_b]);
//!
//! tx_a.unbounded_send(1).unwrap();
//! // `b` hasn't produced anything yet, so `1` can't be yielded
//! assert_eq!(merged.next().now_or_never(), None);
//!
//! tx_b.unbounded_send(2).unwrap();
//! assert_eq!(block_on(merged.next()), Some(1));
//! drop(tx_a);
//! assert_eq!(block_on(merged.next()), Some(2));
//! ```
//!
//! # Errors
//!
//! Streams of `Result`s are merged by their `Ok` values with [`Merged::try_build`] or
//! [`try_merge`]. A failing source ends the whole merge with [`MergeError::Source`], while
//! a failing comparator yields [`MergeError::Comparator`] and can be polled again.
//!
//! ```
//! use futures::{executor::block_on, stream::{self, StreamExt}};
//! use stream_merge::{try_merge, MergeError};
//!
//! let merged = try_merge([
//!     stream::iter(vec![Ok(1), Err("disconnected")]),
//!     stream::iter(vec![Ok(2), Ok(3)]),
//! ]);
//! let res: Vec<_> = block_on(merged.collect());
//! assert_eq!(
//!     res,
//!     [Ok(1), Err(MergeError::Source { index: 0, error: "disconnected" })]
//! );
//! ```
//!
//! # Custom comparator
//!
//! Use the builder to specify custom ordering (by comparison function, by key, reversed, or
//! by [`Ord`]). Implement a custom [`comparator`](crate::comparators::Comparator) for even
//! more control.
//! ```
//! use futures::{executor::block_on, stream::{self, StreamExt}};
//! use stream_merge::Merged;
//!
//! // Merge by descending absolute value
//! let merged = Merged::new([stream::iter(vec![-3_i32, -1]), stream::iter(vec![2, -2])])
//!     .by_key(|x: &i32| x.abs())
//!     .reversed()
//!     .build();
//! assert_eq!(block_on(merged.collect::<Vec<_>>()), vec![-3, 2, -2, -1]);
//! ```
#![no_std]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(any(test, fuzzing))]
#[macro_use]
extern crate std;

mod builder;
pub mod comparators;
mod convenience;
mod engine;
mod error;
mod stream;

pub use builder::Merged;
pub use convenience::*;
pub use error::MergeError;
pub use stream::{MergeResult, MergedStream, NeverFails, SortedStream};


#[doc(hidden)]
#[doc = include_str!("../README.md")]
struct _ReadmeTest;
