// Words the user has typed, with an append-only log on disk

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use tracing::{debug, info};
use vorschlag_core::LoadError;
use vorschlag_core::character::is_well_formed_word;
use vorschlag_core::resource::read_text;

/// Default number of words kept in the history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Outcome of [`HistorySet::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// Already present, or the set has no capacity.
    Rejected,
    Added,
    /// Added, and the oldest word was evicted to make room.
    Evicted(String),
}

/// Insertion-ordered, bounded, case-sensitive set of words.
///
/// Re-inserting a present word does not move it. When the set is full the
/// oldest word is evicted.
#[derive(Debug, Clone)]
pub struct HistorySet {
    order: VecDeque<String>,
    members: HashSet<String>,
    capacity: usize,
}

impl HistorySet {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
            capacity,
        }
    }

    /// Add `word`, evicting the oldest word if the set is full.
    pub fn insert(&mut self, word: &str) -> Insertion {
        if self.capacity == 0 || self.members.contains(word) {
            return Insertion::Rejected;
        }
        let mut evicted = None;
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
                evicted = Some(oldest);
            }
        }
        self.order.push_back(word.to_string());
        self.members.insert(word.to_string());
        match evicted {
            Some(oldest) => Insertion::Evicted(oldest),
            None => Insertion::Added,
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.members.contains(word)
    }

    /// Words from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistorySet {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Append-only history file, one word per line.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every word in the log, oldest first. Blank and malformed lines
    /// are skipped.
    pub fn replay(&self) -> Result<Vec<String>, LoadError> {
        let resource = read_text(&self.path)?;
        let mut words = Vec::new();
        for (line, word) in resource.lines() {
            if is_well_formed_word(word) {
                words.push(word.to_string());
            } else if !word.is_empty() {
                debug!(line = line + 1, "skipping malformed history line");
            }
        }
        info!(path = %self.path.display(), words = words.len(), "history replayed");
        Ok(words)
    }

    /// Append one word, creating the file if needed.
    pub fn append(&self, word: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{word}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut h = HistorySet::new(10);
        assert_eq!(h.insert("Haus"), Insertion::Added);
        assert_eq!(h.insert("Haus"), Insertion::Rejected);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn case_sensitive() {
        let mut h = HistorySet::new(10);
        h.insert("Haus");
        assert!(h.contains("Haus"));
        assert!(!h.contains("haus"));
        assert_eq!(h.insert("haus"), Insertion::Added);
    }

    #[test]
    fn evicts_oldest() {
        let mut h = HistorySet::new(2);
        h.insert("eins");
        h.insert("zwei");
        assert_eq!(h.insert("eins"), Insertion::Rejected);
        assert_eq!(h.insert("drei"), Insertion::Evicted("eins".to_string()));
        assert_eq!(h.iter().collect::<Vec<_>>(), vec!["zwei", "drei"]);
        assert!(!h.contains("eins"));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut h = HistorySet::new(0);
        assert_eq!(h.insert("Haus"), Insertion::Rejected);
        assert!(h.is_empty());
    }

    #[test]
    fn log_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("history.txt"));
        log.append("Haustür").unwrap();
        log.append("Garten").unwrap();
        assert_eq!(log.replay().unwrap(), vec!["Haustür", "Garten"]);
    }

    #[test]
    fn replay_skips_blank_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");
        std::fs::write(&path, "Haus\n\nzwei Wörter\n  Garten  \n").unwrap();
        let log = HistoryLog::new(&path);
        assert_eq!(log.replay().unwrap(), vec!["Haus", "Garten"]);
    }

    #[test]
    fn replay_of_missing_log_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("none.txt"));
        assert!(log.replay().unwrap_err().is_missing());
    }
}
