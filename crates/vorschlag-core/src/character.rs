// Case folding and word-shape utilities
//
// All matching in the engine is case-insensitive while display keeps the
// original casing. Folding is done character by character with the full
// Unicode lowercase mapping, so the folded form of a word and the folded
// form of each of its prefixes always agree (no context-dependent rules).

/// Iterate over the case-folded characters of `s`.
///
/// A single input character may fold to more than one character
/// (e.g. U+0130 LATIN CAPITAL LETTER I WITH DOT ABOVE).
pub fn folded_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Return the case-folded form of `s`.
pub fn fold_case(s: &str) -> String {
    folded_chars(s).collect()
}

/// Check whether `word` starts with `prefix`, ignoring case.
///
/// An empty prefix matches every word.
pub fn starts_with_ignore_case(word: &str, prefix: &str) -> bool {
    let mut word_chars = folded_chars(word);
    folded_chars(prefix).all(|p| word_chars.next() == Some(p))
}

/// Compare two strings for equality, ignoring case.
pub fn equals_ignore_case(a: &str, b: &str) -> bool {
    folded_chars(a).eq(folded_chars(b))
}

/// Number of characters (Unicode scalar values) in `s`.
///
/// Every length in the engine (prefix length, compound part length, the
/// "word too short" rule) is measured in characters, not bytes.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Check whether a character is whitespace.
///
/// Recognizes the ASCII controls TAB..CR, SPACE, NEL, NO-BREAK SPACE and the
/// Unicode space separators.
pub fn is_whitespace(c: char) -> bool {
    let cp = c as u32;
    (0x09..=0x0D).contains(&cp)
        || cp == 0x20
        || cp == 0x85
        || cp == 0xA0
        || cp == 0x1680
        || (0x2000..=0x200A).contains(&cp)
        || cp == 0x2028
        || cp == 0x2029
        || cp == 0x202F
        || cp == 0x205F
        || cp == 0x3000
}

/// Check whether `word` has the shape of a single dictionary word:
/// non-empty, no whitespace, no control characters.
pub fn is_well_formed_word(word: &str) -> bool {
    !word.is_empty() && !word.chars().any(|c| is_whitespace(c) || c.is_control())
}
