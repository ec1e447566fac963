#![allow(dead_code)]

use std::{
    cmp::Ordering,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering::SeqCst},
        Arc, Once,
    },
    task::{Context, Poll},
};

use futures::{executor::block_on, stream, Stream, StreamExt, TryStreamExt};
use stream_merge::{merge, Merged};

/// Routes the crate's `tracing` output to the test harness, run with `RUST_LOG=trace` to see it
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Wrapper for an item and its source index
/// Has the same ordering as the item
#[derive(Debug, Clone, Copy)]
pub struct LabeledItem<T> {
    pub item: T,
    pub source: usize,
}

impl<T: Ord> Ord for LabeledItem<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.item.cmp(&other.item)
    }
}

impl<T: PartialOrd> PartialOrd for LabeledItem<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.item.partial_cmp(&other.item)
    }
}

impl<T: PartialEq> PartialEq for LabeledItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.item == other.item
    }
}

impl<T> Eq for LabeledItem<T> where T: Eq {}

/// Source streams yielding `input` labeled with their position
pub fn labeled<T: Copy>(
    input: &[Vec<T>],
) -> Vec<stream::Iter<std::vec::IntoIter<LabeledItem<T>>>> {
    input
        .iter()
        .enumerate()
        .map(|(source, items)| {
            stream::iter(
                items
                    .iter()
                    .map(|&item| LabeledItem { item, source })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Replays a merge against the inputs it was built from
pub struct MergeChecker<'a, T> {
    items: Vec<&'a [T]>,
    orig: &'a [Vec<T>],
}

impl<'a, T> MergeChecker<'a, T>
where
    T: core::fmt::Debug + Ord,
{
    pub fn new(items: &'a [Vec<T>]) -> Self {
        Self {
            orig: items,
            items: Vec::new(),
        }
    }

    pub fn check_merge(&mut self, merge: impl IntoIterator<Item = LabeledItem<T>>) {
        // reset:
        self.items.clear();
        self.items.extend(self.orig.iter().map(AsRef::<[T]>::as_ref));
        merge
            .into_iter()
            .for_each(|choice| self.check_choice(&choice));

        assert!(
            self.items.iter().all(|it| it.is_empty()),
            "Some items are not consumed"
        );
    }

    fn check_choice(&mut self, choice: &LabeledItem<T>) {
        for (source, item) in self
            .items
            .iter()
            .enumerate()
            .filter_map(|(source, items)| items.first().map(|item| (source, item)))
        {
            match item.cmp(&choice.item) {
                Ordering::Less => {
                    panic!("chosen item {choice:?} is greater than item {item:?} from source {source}")
                }
                Ordering::Equal => {
                    assert!(
                        source >= choice.source,
                        "item from earlier source {source} should've been chosen instead of {choice:?}"
                    );
                }
                Ordering::Greater => {}
            }
        }
        let Some((item, rest)) = self.items[choice.source].split_first() else {
            panic!("item was consumed from empty source {}", choice.source);
        };

        assert_eq!(item, &choice.item);
        self.items[choice.source] = rest;
    }
}

/// Runs every way of building a min-merge over `input` and checks each result
pub fn test_all_merges<T>(input: &Vec<Vec<T>>)
where
    T: Ord + core::fmt::Debug + Copy,
{
    let mut checker = MergeChecker::new(input);

    checker.check_merge(block_on(Merged::new(labeled(input)).build().collect::<Vec<_>>()));
    checker.check_merge(block_on(merge(labeled(input)).collect::<Vec<_>>()));
    checker.check_merge(
        block_on(
            Merged::new(
                labeled(input)
                    .into_iter()
                    .map(|source| source.map(Ok::<_, ()>)),
            )
            .try_build()
            .try_collect::<Vec<_>>(),
        )
        .expect("no source fails"),
    );
}

/// Stream that counts how many items were taken from it
#[derive(Debug)]
pub struct Counted<S> {
    inner: S,
    pulled: Arc<AtomicUsize>,
}

impl<S> Counted<S> {
    pub fn new(inner: S) -> (Self, Arc<AtomicUsize>) {
        let pulled = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                pulled: Arc::clone(&pulled),
            },
            pulled,
        )
    }
}

impl<S: Stream + Unpin> Stream for Counted<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        let polled = self.inner.poll_next_unpin(cx);
        if let Poll::Ready(Some(_)) = polled {
            self.pulled.fetch_add(1, SeqCst);
        }
        polled
    }
}
