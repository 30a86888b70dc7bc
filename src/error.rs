use thiserror::Error;

/// Errors reported before or instead of a search result.
///
/// A cooperative abort is *not* an error: the engine returns a partial
/// result flagged with [`crate::result::SearchStatus::Aborted`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// More vertices than the engine can represent.
    #[error("too many vertices: {0} (limit is 2^30)")]
    TooManyVertices(usize),
    /// An edge endpoint outside `0..n`.
    #[error("edge endpoint {vertex} out of range for a graph on {n} vertices")]
    EdgeOutOfRange { vertex: usize, n: usize },
    /// A malformed initial partition (duplicated or missing positions).
    #[error("invalid initial partition: {0}")]
    InvalidPartition(String),
    /// An array that is not a permutation of `0..n`.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    /// A malformed graph6/sparse6/digraph6 payload.
    #[error("parse error at byte {offset}: {reason}")]
    Parse { offset: usize, reason: String },
    /// Group enumeration hit the caller-supplied size bound.
    #[error("group larger than the requested bound of {bound} elements")]
    GroupTooLarge { bound: usize },
}
