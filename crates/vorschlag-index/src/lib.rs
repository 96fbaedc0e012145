//! Index structures for prefix completion.
//!
//! Two independent implementations of "find the words under a prefix":
//!
//! - [`prefix`] -- [`PrefixIndex`], a pointer trie with alphabetically ordered
//!   children that records a lemma and the original casing per entry. It has
//!   no notion of score; ranking happens outside.
//! - [`packed`] -- [`PackedTrie`], an array-backed trie storing a score per
//!   entry and the maximum score per subtree, answering top-K queries with
//!   subtree pruning. It implements [`RankedIndex`].
//! - [`node`] -- The fixed-size packed node record
//! - [`format`] -- Binary image header and fingerprinting for [`PackedTrie`]

pub mod format;
pub mod node;
pub mod packed;
pub mod prefix;

pub use packed::PackedTrie;
pub use prefix::PrefixIndex;

/// Error type for packed index construction, queries and image loading.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid magic number in index image header")]
    InvalidMagic,
    #[error("unsupported index image version {0}")]
    UnsupportedVersion(u16),
    #[error("image too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("corrupt index: {0}")]
    Corrupt(String),
    #[error("index capacity exceeded ({0} nodes)")]
    CapacityExceeded(usize),
}

/// Default number of results for a ranked query.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A prefix index that ranks its entries by a score fixed at insertion time.
///
/// Implementations must never panic or return errors from queries. When an
/// implementation detects that its own structure is inconsistent it returns
/// an empty result and reports `is_available() == false` from then on;
/// callers are expected to check availability before every query and use
/// another path once it turns false.
pub trait RankedIndex {
    /// Whether this index can currently answer queries.
    fn is_available(&self) -> bool;

    /// Insert `word` with a precomputed score. Re-inserting a word keeps the
    /// higher of the two scores.
    fn insert_word(&mut self, word: &str, score: f64);

    /// Return up to `max_results` `(word, score)` pairs whose case-folded
    /// form starts with the case-folded `prefix`, by descending score.
    /// Ties keep alphabetical (folded) order.
    fn search_scored(&self, prefix: &str, max_results: usize) -> Vec<(String, f64)>;

    /// Like [`search_scored`](Self::search_scored) without the scores.
    fn search_ranked(&self, prefix: &str, max_results: usize) -> Vec<String> {
        self.search_scored(prefix, max_results)
            .into_iter()
            .map(|(word, _)| word)
            .collect()
    }
}
