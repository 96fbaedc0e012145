// Morphological expansion and compound splitting
//
// The expander fails open: without a loaded dictionary every word is
// considered valid and every lemma expands to itself.

use vorschlag_core::character::is_well_formed_word;

use crate::dictionary::AffixDictionary;

/// Default minimum length of a compound part, in characters.
pub const DEFAULT_MIN_COMPOUND_PART: usize = 4;

/// A source of word validity and inflected forms.
///
/// Lookups are case-insensitive. Implementations must be thread-safe since
/// the expander is shared between query threads.
pub trait Lexicon: Send + Sync {
    /// Check whether `word` is a valid word form.
    fn lookup(&self, word: &str) -> bool;

    /// The surface forms of `lemma`, starting with the lemma itself.
    fn surface_forms(&self, lemma: &str) -> Vec<String>;
}

/// Validates words, expands lemmas and splits compounds against an optional
/// lexicon.
pub struct MorphologicalExpander {
    lexicon: Option<Box<dyn Lexicon>>,
}

impl MorphologicalExpander {
    /// An expander with no dictionary: everything is valid.
    pub fn without_dictionary() -> Self {
        Self { lexicon: None }
    }

    pub fn with_lexicon(lexicon: Box<dyn Lexicon>) -> Self {
        Self {
            lexicon: Some(lexicon),
        }
    }

    pub fn from_dictionary(dictionary: Option<AffixDictionary>) -> Self {
        match dictionary {
            Some(d) => Self::with_lexicon(Box::new(d)),
            None => Self::without_dictionary(),
        }
    }

    pub fn has_dictionary(&self) -> bool {
        self.lexicon.is_some()
    }

    /// Dictionary lookup, ignoring case.
    ///
    /// Always `true` without a dictionary. Malformed words (empty, containing
    /// whitespace or control characters) are never valid when a dictionary is
    /// loaded.
    pub fn is_valid(&self, word: &str) -> bool {
        match &self.lexicon {
            None => true,
            Some(lexicon) => is_well_formed_word(word) && lexicon.lookup(word),
        }
    }

    /// The surface forms of `lemma`: the lemma first, then the forms its
    /// affix rules produce. Just `[lemma]` without affix data.
    pub fn expand_lemma(&self, lemma: &str) -> Vec<String> {
        match &self.lexicon {
            None => vec![lemma.to_string()],
            Some(lexicon) => lexicon.surface_forms(lemma),
        }
    }

    /// Split `word` into valid parts of at least `min_len` characters.
    ///
    /// Scans split points left to right and takes the first one whose left
    /// part is valid and whose right part is either valid or splits
    /// recursively. Falls back to `[word]` if the word itself is valid, and
    /// to an empty list otherwise. Without a dictionary the result is empty.
    ///
    /// ```
    /// use vorschlag_de::{AffixDictionary, MorphologicalExpander};
    ///
    /// let dict = AffixDictionary::from_texts("Kinder\nGarten\n", None);
    /// let expander = MorphologicalExpander::from_dictionary(Some(dict));
    /// assert_eq!(expander.split_compound("Kindergarten", 4), vec!["Kinder", "garten"]);
    /// ```
    pub fn split_compound(&self, word: &str, min_len: usize) -> Vec<String> {
        if self.lexicon.is_none() || word.is_empty() {
            return Vec::new();
        }
        let chars: Vec<char> = word.chars().collect();
        let mut memo = vec![None; chars.len() + 1];
        self.split_from(&chars, 0, min_len, &mut memo)
    }

    /// Decompose `chars[start..]`. The result depends only on `start`, so it
    /// is memoized per offset.
    fn split_from(
        &self,
        chars: &[char],
        start: usize,
        min_len: usize,
        memo: &mut [Option<Vec<String>>],
    ) -> Vec<String> {
        if let Some(hit) = &memo[start] {
            return hit.clone();
        }
        let word: String = chars[start..].iter().collect();
        let len = chars.len() - start;

        let mut result = None;
        if len >= min_len.saturating_mul(2) {
            for i in start + min_len..=chars.len() - min_len {
                let left: String = chars[start..i].iter().collect();
                if !self.is_valid(&left) {
                    continue;
                }
                let right: String = chars[i..].iter().collect();
                if self.is_valid(&right) {
                    result = Some(vec![left, right]);
                    break;
                }
                let rest = self.split_from(chars, i, min_len, memo);
                if !rest.is_empty() {
                    let mut parts = Vec::with_capacity(rest.len() + 1);
                    parts.push(left);
                    parts.extend(rest);
                    result = Some(parts);
                    break;
                }
            }
        }
        let result = result.unwrap_or_else(|| {
            if self.is_valid(&word) {
                vec![word]
            } else {
                Vec::new()
            }
        });
        memo[start] = Some(result.clone());
        result
    }

    /// Whether `word` decomposes into two or more valid parts.
    pub fn is_compound(&self, word: &str, min_len: usize) -> bool {
        self.split_compound(word, min_len).len() >= 2
    }
}

impl std::fmt::Debug for MorphologicalExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphologicalExpander")
            .field("has_dictionary", &self.has_dictionary())
            .finish()
    }
}
