// Word list with affix flags (Hunspell .dic + .aff)

use std::path::Path;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info, warn};
use vorschlag_core::LoadError;
use vorschlag_core::character::{char_len, fold_case};
use vorschlag_core::resource::read_text;

use crate::affix::{AffixData, AffixKind, AffixRule, Flag, FlagMode};
use crate::morphology::Lexicon;

/// One line of the word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DicEntry {
    pub word: String,
    pub flags: Vec<Flag>,
}

/// A word list plus optional affix rules.
///
/// Lookup is case-insensitive: stems are keyed by their folded form and a
/// word is valid if it is a stem or can be derived from one by a rule whose
/// flag the stem carries.
#[derive(Debug, Clone, Default)]
pub struct AffixDictionary {
    entries: Vec<DicEntry>,
    stems: HashMap<String, Vec<Flag>>,
    affixes: Option<AffixData>,
    skipped: usize,
}

impl AffixDictionary {
    /// Build a dictionary from the text of a .dic file and, optionally, an
    /// .aff file.
    pub fn from_texts(dic: &str, aff: Option<&str>) -> Self {
        let affixes = aff.map(AffixData::parse);
        let flag_mode = affixes.as_ref().map_or(FlagMode::Char, |a| a.flag_mode);

        let mut dict = Self {
            affixes,
            ..Self::default()
        };
        for (i, raw) in dic.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            // Optional entry count on the first line
            if i == 0 && line.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            match parse_dic_line(line, flag_mode) {
                Some(entry) => dict.push(entry),
                None => {
                    debug!(line = i + 1, "skipping dictionary line");
                    dict.skipped += 1;
                }
            }
        }
        dict
    }

    /// Load a dictionary from disk. A missing affix file is logged and the
    /// dictionary is used without affix rules.
    pub fn load(dic_path: &Path, aff_path: Option<&Path>) -> Result<Self, LoadError> {
        let dic = read_text(dic_path)?;
        let aff = match aff_path {
            Some(path) => match read_text(path) {
                Ok(aff) => Some(aff),
                Err(e) => {
                    warn!(error = %e, "affix rules unavailable, using bare word list");
                    None
                }
            },
            None => None,
        };
        let dict = Self::from_texts(&dic.text, aff.as_ref().map(|a| a.text.as_str()));
        info!(
            path = %dic_path.display(),
            entries = dict.len(),
            skipped = dict.skipped,
            rules = dict.affixes.as_ref().map_or(0, AffixData::rule_count),
            "dictionary loaded"
        );
        Ok(dict)
    }

    fn push(&mut self, entry: DicEntry) {
        let flags = self.stems.entry(fold_case(&entry.word)).or_default();
        for &f in &entry.flags {
            if !flags.contains(&f) {
                flags.push(f);
            }
        }
        self.entries.push(entry);
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[DicEntry] {
        &self.entries
    }

    /// Words in file order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.word.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of dictionary lines that were skipped as malformed.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    pub fn affixes(&self) -> Option<&AffixData> {
        self.affixes.as_ref()
    }

    fn has_flag(&self, folded_stem: &str, flag: Flag) -> bool {
        self.stems
            .get(folded_stem)
            .is_some_and(|flags| flags.contains(&flag))
    }

    /// Case-insensitive validity check.
    pub fn check(&self, word: &str) -> bool {
        let folded = fold_case(word);
        if self.stems.contains_key(&folded) {
            return true;
        }
        let Some(affixes) = &self.affixes else {
            return false;
        };

        for sfx in &affixes.suffixes {
            let Some(stem) = sfx.unapply(&folded) else {
                continue;
            };
            if self.has_flag(&stem, sfx.flag) {
                return true;
            }
            if !sfx.cross_product {
                continue;
            }
            for pfx in affixes.prefixes.iter().filter(|p| p.cross_product) {
                if let Some(base) = pfx.unapply(&stem) {
                    if self.has_flag(&base, pfx.flag) && self.has_flag(&base, sfx.flag) {
                        return true;
                    }
                }
            }
        }
        affixes.prefixes.iter().any(|pfx| {
            pfx.unapply(&folded)
                .is_some_and(|stem| self.has_flag(&stem, pfx.flag))
        })
    }

    /// The lemma followed by every form its flags generate, de-duplicated in
    /// rule order. A lemma that is not in the dictionary, or a dictionary
    /// without affix rules, yields just the lemma.
    pub fn expand(&self, lemma: &str) -> Vec<String> {
        let mut forms = vec![lemma.to_string()];
        let Some(affixes) = &self.affixes else {
            return forms;
        };
        let Some(flags) = self.stems.get(&fold_case(lemma)) else {
            return forms;
        };
        if flags.is_empty() {
            return forms;
        }

        let suffixes: Vec<&AffixRule> = affixes
            .suffixes
            .iter()
            .filter(|r| flags.contains(&r.flag))
            .collect();
        let prefixes: Vec<&AffixRule> = affixes
            .prefixes
            .iter()
            .filter(|r| flags.contains(&r.flag))
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(lemma.to_string());
        let mut push = |form: String, forms: &mut Vec<String>| {
            if seen.insert(form.clone()) {
                forms.push(form);
            }
        };

        for sfx in &suffixes {
            if let Some(form) = sfx.apply(lemma) {
                push(form, &mut forms);
            }
        }
        for pfx in &prefixes {
            if let Some(form) = pfx.apply(lemma) {
                push(form, &mut forms);
            }
        }
        for sfx in suffixes.iter().filter(|r| r.cross_product) {
            let Some(suffixed) = sfx.apply(lemma) else {
                continue;
            };
            for pfx in prefixes.iter().filter(|r| r.cross_product) {
                // The prefix condition applies to the stem, not the suffixed form
                if pfx.apply(lemma).is_none() {
                    continue;
                }
                if let Some(form) = apply_prefix_unchecked(pfx, &suffixed) {
                    push(form, &mut forms);
                }
            }
        }
        forms
    }
}

impl Lexicon for AffixDictionary {
    fn lookup(&self, word: &str) -> bool {
        self.check(word)
    }

    fn surface_forms(&self, lemma: &str) -> Vec<String> {
        self.expand(lemma)
    }
}

fn apply_prefix_unchecked(rule: &AffixRule, word: &str) -> Option<String> {
    debug_assert_eq!(rule.kind, AffixKind::Prefix);
    let n = rule.strip.chars().count();
    let mut chars = word.chars();
    let head: String = chars.by_ref().take(n).collect();
    if char_len(&head) < n || fold_case(&head) != fold_case(&rule.strip) {
        return None;
    }
    let mut out = rule.add.clone();
    out.extend(chars);
    Some(out)
}

/// Parse `word[/FLAGS][ fields...]`. Returns `None` for entries of one
/// character or less.
fn parse_dic_line(line: &str, flag_mode: FlagMode) -> Option<DicEntry> {
    let token = line.split_whitespace().next()?;
    let (word, flags) = match token.split_once('/') {
        Some((w, f)) => (w, flag_mode.parse_flags(f)),
        None => (token, Vec::new()),
    };
    if char_len(word) <= 1 {
        return None;
    }
    Some(DicEntry {
        word: word.to_string(),
        flags,
    })
}
