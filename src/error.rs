use core::convert::Infallible;

use thiserror::Error;

/// Errors produced by a [`MergedStream`](crate::MergedStream).
///
/// `S` is the error type of the merged sources, `C` the error type of the comparator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError<S, C = Infallible> {
    /// A source failed mid-stream. This is terminal: every source is dropped and the
    /// merged stream ends after yielding this error.
    #[error("source {index} failed")]
    Source {
        /// Position of the failed source among the streams passed to the builder
        index: usize,
        #[source]
        error: S,
    },

    /// The comparator failed. No item was consumed, the next poll retries the same selection.
    #[error("comparator failed")]
    Comparator(#[source] C),
}

impl<S, C> MergeError<S, C> {
    /// Returns `true` for [`MergeError::Source`], which ends the merged stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Source { .. })
    }
}

impl MergeError<Infallible, Infallible> {
    /// A merge of infallible sources with an infallible comparator can't produce an error.
    #[inline]
    pub(crate) fn unreachable(self) -> ! {
        match self {
            Self::Source { error, .. } => match error {},
            Self::Comparator(error) => match error {},
        }
    }
}
