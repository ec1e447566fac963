//! Bookkeeping of the merge: one single-item slot per source, the emission gate and the
//! selector.
//!
//! Sources are kept in the order they were passed to the builder. That order is the
//! tie-break order, so removal always shifts (never swaps) the remaining sources, and
//! nothing is removed while the source list is being scanned.

use core::{
    cmp::Ordering,
    pin::Pin,
    task::{Context, Poll},
};

use alloc::{boxed::Box, vec::Vec};
use futures_core::{Stream, TryStream};
use tracing::trace;

use crate::comparators::TryComparator;

/// A source failed while being polled for its next item
#[derive(Debug)]
pub(crate) struct SourceFault<E> {
    pub(crate) index: usize,
    pub(crate) error: E,
}

/// One input stream and its single-item buffer
pub(crate) struct Source<S, T> {
    /// Position among the streams passed to the builder
    pub(crate) index: usize,
    pub(crate) stream: Pin<Box<S>>,
    pub(crate) slot: Option<T>,
    /// Reported its end during the current `fill` scan, removed once the scan is over
    ended: bool,
}

impl<S, T> core::fmt::Debug for Source<S, T>
where
    T: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Source")
            .field("index", &self.index)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

/// Outcome of a single poll of a source with an empty slot
enum Polled {
    Filled,
    Ended,
    Pending,
}

pub(crate) struct Engine<S, T> {
    /// Active sources: not yet ended, or still holding an item
    sources: Vec<Source<S, T>>,
    /// Number of active sources with a filled slot
    ready: usize,
}

impl<S, T> core::fmt::Debug for Engine<S, T>
where
    T: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("sources", &self.sources)
            .field("ready", &self.ready)
            .finish()
    }
}

impl<S, T> Engine<S, T>
where
    S: TryStream<Ok = T>,
{
    pub(crate) fn new(streams: impl IntoIterator<Item = S>) -> Self {
        let sources = streams
            .into_iter()
            .enumerate()
            .map(|(index, stream)| Source {
                index,
                stream: Box::pin(stream),
                slot: None,
                ended: false,
            })
            .collect();
        Self { sources, ready: 0 }
    }

    /// Number of active sources
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.sources.len()
    }

    /// The emission gate: every active source holds an item.
    ///
    /// Trivially true once there are no active sources left.
    #[inline]
    pub(crate) fn all_ready(&self) -> bool {
        debug_assert_eq!(
            self.ready,
            self.sources.iter().filter(|s| s.slot.is_some()).count()
        );
        self.ready == self.sources.len()
    }

    /// Polls every source with an empty slot exactly once.
    ///
    /// Sources that end are removed after the scan; a source that has nothing yet registers
    /// the waker from `cx`, so the task is woken as soon as it has.
    pub(crate) fn fill(&mut self, cx: &mut Context<'_>) -> Result<(), SourceFault<S::Error>> {
        let mut ended = 0_usize;
        let mut fault = None;
        for source in self.sources.iter_mut().filter(|s| s.slot.is_none()) {
            match Self::poll_source(source, cx) {
                Ok(Polled::Filled) => self.ready += 1,
                Ok(Polled::Ended) => {
                    source.ended = true;
                    ended += 1;
                }
                Ok(Polled::Pending) => {}
                Err(err) => {
                    fault = Some(err);
                    break;
                }
            }
        }
        if ended > 0 {
            // single pass, keeps the relative order of the survivors
            self.sources.retain(|source| {
                if source.ended {
                    trace!(source = source.index, "source ended");
                }
                !source.ended
            });
        }
        fault.map_or(Ok(()), Err)
    }

    /// Requests the next item from the source at `pos`, which just had its item drained.
    ///
    /// A source that ends here is removed right away.
    pub(crate) fn refill(
        &mut self, pos: usize, cx: &mut Context<'_>,
    ) -> Result<(), SourceFault<S::Error>> {
        match Self::poll_source(&mut self.sources[pos], cx)? {
            Polled::Filled => self.ready += 1,
            Polled::Ended => {
                let removed = self.sources.remove(pos);
                trace!(source = removed.index, "source ended");
            }
            Polled::Pending => {}
        }
        Ok(())
    }

    /// REQUIRES the slot of `source` to be empty
    fn poll_source(
        source: &mut Source<S, T>, cx: &mut Context<'_>,
    ) -> Result<Polled, SourceFault<S::Error>> {
        debug_assert!(source.slot.is_none());
        match source.stream.as_mut().try_poll_next(cx) {
            Poll::Ready(Some(Ok(item))) => {
                source.slot = Some(item);
                Ok(Polled::Filled)
            }
            Poll::Ready(Some(Err(error))) => Err(SourceFault {
                index: source.index,
                error,
            }),
            Poll::Ready(None) => Ok(Polled::Ended),
            Poll::Pending => Ok(Polled::Pending),
        }
    }

    /// Finds the source holding the smallest item and drains its slot.
    ///
    /// Only a strictly smaller item replaces the current candidate, so among equal items
    /// the leftmost source wins. A comparator error is returned before any slot is touched.
    ///
    /// Returns the position of the drained source along with the item, `None` if no
    /// source holds an item.
    pub(crate) fn pop_min<C>(&mut self, cmp: &C) -> Result<Option<(usize, T)>, C::Error>
    where
        C: TryComparator<T>,
    {
        let mut candidates = self
            .sources
            .iter()
            .enumerate()
            .filter_map(|(pos, source)| source.slot.as_ref().map(|item| (pos, item)));
        let Some(mut min) = candidates.next() else {
            return Ok(None);
        };
        for candidate in candidates {
            if cmp.try_compare(candidate.1, min.1)? == Ordering::Less {
                min = candidate;
            }
        }
        let pos = min.0;
        Ok(self.sources[pos].slot.take().map(|item| {
            self.ready -= 1;
            (pos, item)
        }))
    }

    /// Drops every source
    pub(crate) fn clear(&mut self) {
        self.sources.clear();
        self.ready = 0;
    }

    /// Items currently buffered plus what the sources report about themselves
    pub(crate) fn size_hint(&self) -> (usize, Option<usize>) {
        let mut lower = self.ready;
        let mut upper = lower;
        let mut has_upper = true;
        for source in &self.sources {
            let (it_lower, it_upper) = source.stream.size_hint();
            lower = lower.saturating_add(it_lower);
            if let Some(it_upper) = it_upper {
                let overflow;
                (upper, overflow) = upper.overflowing_add(it_upper);
                has_upper &= !overflow;
            } else {
                has_upper = false;
            }
        }
        (lower, has_upper.then_some(upper))
    }

    /// Gives up the remaining sources in the order they were passed to the builder
    pub(crate) fn into_sources(self) -> Vec<Source<S, T>> {
        self.sources
    }
}
