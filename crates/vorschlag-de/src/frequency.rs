// Word popularity ranks from a frequency corpus

use std::path::Path;

use hashbrown::HashMap;
use tracing::info;
use vorschlag_core::LoadError;
use vorschlag_core::character::fold_case;
use vorschlag_core::resource::{TextResource, read_text};

/// Default highest meaningful rank.
pub const DEFAULT_MAX_RANK: usize = 10_000;

/// Maps case-folded words to their 0-based corpus rank (lower is more
/// frequent).
///
/// The rank of a word is the index of the line it first appears on; blank
/// lines still consume an index. Unknown words, and words ranked beyond
/// `max_rank`, get the sentinel rank `max_rank + 1`.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    ranks: HashMap<String, usize>,
    max_rank: usize,
}

impl FrequencyTable {
    /// An empty table: every word gets the sentinel rank.
    pub fn new(max_rank: usize) -> Self {
        Self {
            ranks: HashMap::new(),
            max_rank,
        }
    }

    pub fn from_resource(resource: &TextResource, max_rank: usize) -> Self {
        let mut table = Self::new(max_rank);
        for (rank, word) in resource.lines() {
            table.insert(word, rank);
        }
        table
    }

    /// Build a table from words in corpus order.
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>, max_rank: usize) -> Self {
        let mut table = Self::new(max_rank);
        for (rank, word) in words.into_iter().enumerate() {
            table.insert(word, rank);
        }
        table
    }

    pub fn load(path: &Path, max_rank: usize) -> Result<Self, LoadError> {
        let resource = read_text(path)?;
        let table = Self::from_resource(&resource, max_rank);
        info!(path = %path.display(), words = table.len(), "frequency corpus loaded");
        Ok(table)
    }

    /// Record `word` at `rank` unless it already has one. Blank words are
    /// ignored.
    pub fn insert(&mut self, word: &str, rank: usize) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }
        self.ranks.entry(fold_case(word)).or_insert(rank);
    }

    /// The rank of `word`, case-insensitively, clamped to the sentinel.
    pub fn rank(&self, word: &str) -> usize {
        self.ranks
            .get(&fold_case(word))
            .map_or(self.sentinel(), |&r| r.min(self.sentinel()))
    }

    /// `(max_rank + 1) - rank`: zero for unknown words.
    pub fn frequency(&self, word: &str) -> usize {
        self.sentinel() - self.rank(word)
    }

    pub fn sentinel(&self) -> usize {
        self.max_rank.saturating_add(1)
    }

    pub fn max_rank(&self) -> usize {
        self.max_rank
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RANK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn first_occurrence_wins() {
        let t = FrequencyTable::from_words(["der", "Haus", "haus", "die"], 100);
        assert_eq!(t.rank("der"), 0);
        assert_eq!(t.rank("HAUS"), 1);
        assert_eq!(t.rank("die"), 3);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn unknown_words_get_sentinel() {
        let t = FrequencyTable::from_words(["der"], 100);
        assert_eq!(t.rank("Quatsch"), 101);
        assert_eq!(t.frequency("Quatsch"), 0);
        assert_eq!(t.frequency("der"), 101);
    }

    #[test]
    fn ranks_beyond_max_are_clamped() {
        let words: Vec<String> = (0..20).map(|i| format!("w{i}")).collect();
        let t = FrequencyTable::from_words(words.iter().map(String::as_str), 5);
        assert_eq!(t.rank("w3"), 3);
        assert_eq!(t.rank("w15"), 6);
        assert_eq!(t.frequency("w15"), 0);
    }

    #[test]
    fn blank_lines_consume_ranks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "der\n\ndie\n  \ndas\n").unwrap();
        let t = FrequencyTable::load(file.path(), DEFAULT_MAX_RANK).unwrap();
        assert_eq!(t.rank("der"), 0);
        assert_eq!(t.rank("die"), 2);
        assert_eq!(t.rank("das"), 4);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn latin1_corpus_is_decoded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"der\nf\xfcr\n").unwrap();
        let t = FrequencyTable::load(file.path(), DEFAULT_MAX_RANK).unwrap();
        assert_eq!(t.rank("für"), 1);
    }

    #[test]
    fn missing_corpus_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = FrequencyTable::load(&dir.path().join("nope.txt"), 10).unwrap_err();
        assert!(err.is_missing());
    }
}
