// Pointer trie over case-folded characters.
//
// Children are kept in a BTreeMap so that enumeration is alphabetical
// without sorting at query time. Each terminal node remembers the lemma the
// entry belongs to and the casing the word was inserted with.

use std::collections::BTreeMap;

use vorschlag_core::character::folded_chars;

/// Data attached to a node that ends an inserted word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    /// The lemma this surface form belongs to (the word itself by default).
    pub lemma: String,
    /// The word as it was inserted, with its original casing.
    pub display: String,
}

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: Option<Terminal>,
}

/// Character trie mapping case-folded words to lemmas.
///
/// # Example
///
/// ```
/// use vorschlag_index::PrefixIndex;
///
/// let mut index = PrefixIndex::new();
/// index.insert("Haus", None);
/// index.insert("Häuser", Some("Haus"));
/// index.insert("Hallo", None);
///
/// assert_eq!(index.search_prefix("ha"), vec!["Hallo", "Haus"]);
/// assert_eq!(index.search_prefix("HÄ"), vec!["Haus"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct PrefixIndex {
    root: TrieNode,
    len: usize,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `word`, recording `lemma` (or the word itself) at its terminal.
    ///
    /// Re-inserting the same folded word overwrites lemma and casing.
    pub fn insert(&mut self, word: &str, lemma: Option<&str>) {
        let mut node = &mut self.root;
        for c in folded_chars(word) {
            node = node.children.entry(c).or_default();
        }
        if node.terminal.is_none() {
            self.len += 1;
        }
        node.terminal = Some(Terminal {
            lemma: lemma.unwrap_or(word).to_string(),
            display: word.to_string(),
        });
    }

    /// Return the lemmas of every entry under `prefix`, in pre-order:
    /// a node's own lemma first, then each child subtree in ascending
    /// character order. Returns an empty list if no entry has this prefix.
    pub fn search_prefix(&self, prefix: &str) -> Vec<String> {
        self.iter_prefix(prefix)
            .map(|t| t.lemma.clone())
            .collect()
    }

    /// Lazily enumerate the terminals under `prefix` in the same order as
    /// [`search_prefix`](Self::search_prefix). Calling it again restarts the
    /// enumeration.
    pub fn iter_prefix(&self, prefix: &str) -> PrefixIter<'_> {
        let stack = match self.find(prefix) {
            Some(node) => vec![node],
            None => Vec::new(),
        };
        PrefixIter { stack }
    }

    /// Check whether `word` was inserted (case-insensitively).
    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|n| n.terminal.is_some())
    }

    /// The terminal data stored for `word`, if it was inserted.
    pub fn get(&self, word: &str) -> Option<&Terminal> {
        self.find(word).and_then(|n| n.terminal.as_ref())
    }

    /// The original casing `word` was last inserted with.
    pub fn display_form(&self, word: &str) -> Option<&str> {
        self.get(word).map(|t| t.display.as_str())
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn find(&self, key: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in folded_chars(key) {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}

/// Pre-order iterator over the terminals of a subtree.
pub struct PrefixIter<'a> {
    stack: Vec<&'a TrieNode>,
}

impl<'a> Iterator for PrefixIter<'a> {
    type Item = &'a Terminal;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Reverse push so the smallest character is visited first
            self.stack.extend(node.children.values().rev());
            if let Some(terminal) = &node.terminal {
                return Some(terminal);
            }
        }
        None
    }
}
