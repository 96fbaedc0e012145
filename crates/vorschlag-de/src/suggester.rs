// Suggester: owns every component and answers completion queries.
//
// Two paths answer `suggest`:
// - accelerated: the packed index, scores precomputed at insertion time
// - fallback: prefix index -> lemma expansion -> ranking -> sort
//
// Both are built from the same entries. The packed index stores the
// prefix-independent part of each score; the prefix term is added back at
// query time, so both paths order the same candidates the same way. Once the
// packed index reports itself unavailable it is never consulted again.
//
// Loading never fails: every missing or broken resource degrades to a
// smaller engine and is logged.

use std::io::{self, ErrorKind, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use hashbrown::HashSet;
use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};
use vorschlag_core::character::{
    equals_ignore_case, fold_case, is_well_formed_word, starts_with_ignore_case,
};
use vorschlag_core::resource::{TextResource, read_text};
use vorschlag_index::format::Fingerprint;
use vorschlag_index::{PackedTrie, PrefixIndex, RankedIndex};

use crate::builtin::FALLBACK_WORDS;
use crate::config::{ConfigError, SuggesterConfig};
use crate::dictionary::AffixDictionary;
use crate::frequency::FrequencyTable;
use crate::history::{HistoryLog, HistorySet, Insertion};
use crate::morphology::MorphologicalExpander;
use crate::ranking::{RankingEngine, Signals};

/// Word completion engine.
pub struct Suggester {
    index: PrefixIndex,
    accelerated: Option<PackedTrie>,
    expander: MorphologicalExpander,
    ranking: RankingEngine,
    history: HistorySet,
    history_log: Option<HistoryLog>,
    max_results: usize,
    min_compound_part: usize,
    rank_compounds: bool,
}

impl Suggester {
    /// Build a suggester from the resources named in `config`.
    ///
    /// Missing or unreadable resources are logged and replaced: the built-in
    /// word list for the dictionary, an empty table for the frequency
    /// corpus, an empty history for the log.
    pub fn new(config: &SuggesterConfig) -> Self {
        let started = Instant::now();

        let dic = read_optional(config.dictionary.as_deref(), "dictionary");
        let aff = match dic {
            Some(_) => read_optional(config.affix.as_deref(), "affix rules"),
            None => None,
        };
        let corpus = read_optional(config.frequency.as_deref(), "frequency corpus");

        let dictionary = dic.as_ref().map(|d| {
            let dict =
                AffixDictionary::from_texts(&d.text, aff.as_ref().map(|a| a.text.as_str()));
            info!(
                entries = dict.len(),
                skipped = dict.skipped_lines(),
                affix_rules = dict.affixes().map_or(0, |a| a.rule_count()),
                "dictionary loaded"
            );
            dict
        });
        let frequencies = match &corpus {
            Some(c) => FrequencyTable::from_resource(c, config.max_rank),
            None => FrequencyTable::new(config.max_rank),
        };

        // Presence markers: a missing dictionary builds from the built-in
        // list, an empty one builds nothing
        let present = [dic.is_some(), aff.is_some(), corpus.is_some()].map(u8::from);
        let fingerprint = Fingerprint::new()
            .update(&present)
            .update(text_bytes(&dic))
            .update(text_bytes(&aff))
            .update(text_bytes(&corpus))
            .update(&config.weights.to_bytes())
            .update(&(config.max_rank as u64).to_le_bytes())
            .update(&[config.index_inflections as u8])
            .finish();

        let suggester = Self::assemble(dictionary, frequencies, config, Some(fingerprint));
        info!(
            entries = suggester.dictionary_size(),
            frequencies = suggester.ranking.frequencies().len(),
            history = suggester.history.len(),
            accelerated = suggester.is_accelerated(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "suggester ready"
        );
        suggester
    }

    /// Build a suggester from a JSON config file.
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(&SuggesterConfig::from_json_file(path)?))
    }

    /// Build a suggester from data already in memory. Resource paths in
    /// `config` are ignored except for the history log; no index cache is
    /// used.
    pub fn with_data(
        dictionary: Option<AffixDictionary>,
        frequencies: FrequencyTable,
        config: &SuggesterConfig,
    ) -> Self {
        Self::assemble(dictionary, frequencies, config, None)
    }

    fn assemble(
        dictionary: Option<AffixDictionary>,
        frequencies: FrequencyTable,
        config: &SuggesterConfig,
        fingerprint: Option<u64>,
    ) -> Self {
        let ranking = RankingEngine::new(frequencies, config.weights);

        let mut index = PrefixIndex::new();
        match &dictionary {
            Some(dict) => {
                for word in dict.words() {
                    index.insert(word, None);
                }
                if config.index_inflections {
                    for lemma in dict.words() {
                        for form in dict.expand(lemma).into_iter().skip(1) {
                            if !index.contains(&form) {
                                index.insert(&form, Some(lemma));
                            }
                        }
                    }
                }
            }
            None => {
                info!(words = FALLBACK_WORDS.len(), "using the built-in word list");
                for word in FALLBACK_WORDS {
                    index.insert(word, None);
                }
            }
        }

        let accelerated = config.accelerated.then(|| {
            build_accelerated(&index, &ranking, config.index_cache.as_deref(), fingerprint)
        });

        let mut suggester = Self {
            index,
            accelerated,
            expander: MorphologicalExpander::from_dictionary(dictionary),
            ranking,
            history: HistorySet::new(config.history_capacity),
            history_log: None,
            max_results: config.max_results,
            min_compound_part: config.min_compound_part,
            rank_compounds: config.rank_compounds,
        };

        if let Some(path) = &config.history {
            let log = HistoryLog::new(path);
            match log.replay() {
                Ok(words) => {
                    for word in &words {
                        suggester.remember(word);
                    }
                }
                Err(e) if e.is_missing() => debug!(path = %path.display(), "no history log yet"),
                Err(e) => warn!(error = %e, "history log unreadable, starting empty"),
            }
            suggester.history_log = Some(log);
        }
        suggester
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Up to `max_results` distinct words starting with `prefix` (ignoring
    /// case), best first. An empty prefix yields nothing.
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.suggest_scored(prefix)
            .into_iter()
            .map(|(word, _)| word)
            .collect()
    }

    /// Like [`suggest`](Self::suggest) with the score of each word.
    pub fn suggest_scored(&self, prefix: &str) -> Vec<(String, f64)> {
        if prefix.is_empty() || self.max_results == 0 {
            return Vec::new();
        }
        if let Some(trie) = self.accelerated.as_ref().filter(|t| t.is_available()) {
            let results = trie.search_scored(&fold_case(prefix), self.max_results);
            if trie.is_available() {
                let prefix_score = self.ranking.prefix_score(prefix);
                return results
                    .into_iter()
                    .map(|(word, score)| (word, score + prefix_score))
                    .collect();
            }
            warn!("packed index became unavailable, switching to the fallback path");
        }
        self.suggest_fallback(prefix)
    }

    fn suggest_fallback(&self, prefix: &str) -> Vec<(String, f64)> {
        let mut emitted: HashSet<String> = HashSet::new();
        let mut scored: Vec<(String, f64)> = Vec::new();

        for terminal in self.index.iter_prefix(prefix) {
            let lemma = terminal.lemma.as_str();
            for form in self.expander.expand_lemma(lemma) {
                if emitted.contains(&form) || !starts_with_ignore_case(&form, prefix) {
                    continue;
                }
                let signals = Signals {
                    is_lemma: form == lemma,
                    is_history: self.history.contains(&form),
                    is_compound: self.rank_compounds
                        && self.expander.is_compound(&form, self.min_compound_part),
                };
                let score = self.ranking.score(&form, prefix, signals);
                emitted.insert(form.clone());
                scored.push((form, score));
            }
        }
        debug!(prefix, candidates = scored.len(), "fallback search");

        // Stable: equal scores keep alphabetical traversal order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.max_results);
        scored
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Record a word the user typed. It is boosted in later queries and
    /// appended to the history log. Empty, malformed and already recorded
    /// words are ignored.
    pub fn record_usage(&mut self, word: &str) {
        if !self.remember(word) {
            return;
        }
        if let Some(log) = &self.history_log {
            if let Err(e) = log.append(word) {
                warn!(error = %e, path = %log.path().display(), "failed to append to history log");
            }
        }
    }

    /// Add a word to the history and both indexes. Returns `false` if
    /// nothing changed.
    fn remember(&mut self, word: &str) -> bool {
        if word.is_empty() || self.history.contains(word) {
            return false;
        }
        if !is_well_formed_word(word) {
            debug!(word, "ignoring malformed history word");
            return false;
        }
        let evicted = match self.history.insert(word) {
            Insertion::Rejected => return false,
            Insertion::Added => None,
            Insertion::Evicted(oldest) => Some(oldest),
        };
        self.index.insert(word, None);
        let score = self.ranking.history_score();
        if let Some(trie) = self.accelerated.as_mut() {
            trie.insert_word(word, score);
        }
        if let Some(oldest) = evicted {
            self.forget(&oldest);
        }
        true
    }

    /// Drop the history score of a word evicted from the history. It stays
    /// in both indexes and ranks like any other entry again.
    fn forget(&mut self, word: &str) {
        // Another casing of the same word is still in the history
        if self.history.iter().any(|w| equals_ignore_case(w, word)) {
            return;
        }
        let is_lemma = self
            .index
            .get(word)
            .is_none_or(|terminal| terminal.display == terminal.lemma);
        let score = self.ranking.base_score(word, is_lemma);
        if let Some(trie) = self.accelerated.as_mut() {
            trie.set_score(word, score);
        }
        debug!(word, "evicted from history");
    }

    // =========================================================================
    // Options and introspection
    // =========================================================================

    pub fn set_max_results(&mut self, max_results: usize) {
        self.max_results = max_results;
    }

    pub fn set_rank_compounds(&mut self, value: bool) {
        self.rank_compounds = value;
    }

    pub fn set_min_compound_part(&mut self, min_len: usize) {
        self.min_compound_part = min_len;
    }

    /// Stop using the packed index for the rest of this suggester's life.
    pub fn disable_accelerated(&mut self) {
        self.accelerated = None;
    }

    /// Whether queries are currently answered by the packed index.
    pub fn is_accelerated(&self) -> bool {
        self.accelerated.as_ref().is_some_and(|t| t.is_available())
    }

    /// History words, oldest first.
    pub fn history(&self) -> Vec<&str> {
        self.history.iter().collect()
    }

    /// Number of distinct entries in the prefix index.
    pub fn dictionary_size(&self) -> usize {
        self.index.len()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn expander(&self) -> &MorphologicalExpander {
        &self.expander
    }

    pub fn ranking(&self) -> &RankingEngine {
        &self.ranking
    }

    pub fn prefix_index(&self) -> &PrefixIndex {
        &self.index
    }

    pub fn packed_index(&self) -> Option<&PackedTrie> {
        self.accelerated.as_ref()
    }

    #[cfg(test)]
    fn packed_index_mut(&mut self) -> Option<&mut PackedTrie> {
        self.accelerated.as_mut()
    }
}

/// A [`Suggester`] shared between threads. Queries take the read lock,
/// history updates the write lock.
#[derive(Clone)]
pub struct SharedSuggester {
    inner: Arc<RwLock<Suggester>>,
}

impl SharedSuggester {
    pub fn new(suggester: Suggester) -> Self {
        Self {
            inner: Arc::new(RwLock::new(suggester)),
        }
    }

    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.inner.read().suggest(prefix)
    }

    pub fn record_usage(&self, word: &str) {
        self.inner.write().record_usage(word);
    }

    /// Read access for introspection.
    pub fn read(&self) -> RwLockReadGuard<'_, Suggester> {
        self.inner.read()
    }
}

impl From<Suggester> for SharedSuggester {
    fn from(suggester: Suggester) -> Self {
        Self::new(suggester)
    }
}

fn read_optional(path: Option<&Path>, what: &str) -> Option<TextResource> {
    let path = path?;
    match read_text(path) {
        Ok(resource) => Some(resource),
        Err(e) => {
            warn!(resource = what, error = %e, "resource unavailable, continuing without it");
            None
        }
    }
}

fn text_bytes(resource: &Option<TextResource>) -> &[u8] {
    resource.as_ref().map_or(&[], |r| r.text.as_bytes())
}

/// Build the packed index from the prefix index entries, or load it from
/// the cache when the cached image was built from the same resources.
fn build_accelerated(
    index: &PrefixIndex,
    ranking: &RankingEngine,
    cache: Option<&Path>,
    fingerprint: Option<u64>,
) -> PackedTrie {
    let cache = cache.zip(fingerprint);
    if let Some((path, fp)) = cache {
        if let Some(trie) = load_cached_index(path, fp) {
            return trie;
        }
    }

    let started = Instant::now();
    let mut trie = PackedTrie::new();
    for entry in index.iter_prefix("") {
        let score = ranking.base_score(&entry.display, entry.display == entry.lemma);
        trie.insert_word(&entry.display, score);
    }
    if !trie.is_available() {
        warn!("packed index could not be built, using the fallback path");
        return trie;
    }
    info!(
        words = trie.len(),
        nodes = trie.node_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "packed index built"
    );

    if let Some((path, fp)) = cache {
        trie.set_fingerprint(fp);
        match write_atomically(path, &trie.to_bytes()) {
            Ok(()) => debug!(path = %path.display(), "index cache written"),
            Err(e) => warn!(error = %e, path = %path.display(), "failed to write index cache"),
        }
    }
    trie
}

fn load_cached_index(path: &Path, fingerprint: u64) -> Option<PackedTrie> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no index cache yet");
            return None;
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "index cache unreadable, rebuilding");
            return None;
        }
    };
    match PackedTrie::from_bytes(&bytes) {
        Ok(trie) if trie.fingerprint() == fingerprint => {
            info!(path = %path.display(), words = trie.len(), "packed index loaded from cache");
            Some(trie)
        }
        Ok(_) => {
            info!(path = %path.display(), "index cache is stale, rebuilding");
            None
        }
        Err(e) => {
            warn!(error = %e, path = %path.display(), "index cache rejected, rebuilding");
            None
        }
    }
}

/// Write through a temporary file in the same directory and rename it into
/// place, so readers never see a partial image.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SuggesterConfig {
        SuggesterConfig::default()
    }

    fn scenario(accelerated: bool) -> Suggester {
        let dict = AffixDictionary::from_texts("Hallo\nHaus\nHaustür\n", None);
        let freq = FrequencyTable::from_words(["Haus", "Hallo", "Haustür"], 10_000);
        let config = SuggesterConfig {
            accelerated,
            ..config()
        };
        Suggester::with_data(Some(dict), freq, &config)
    }

    #[test]
    fn scenario_on_both_paths() {
        for accelerated in [true, false] {
            let mut s = scenario(accelerated);
            assert_eq!(s.is_accelerated(), accelerated);
            assert_eq!(s.suggest("ha"), vec!["Haus", "Hallo", "Haustür"]);
            s.record_usage("Haustür");
            assert_eq!(s.suggest("ha"), vec!["Haustür", "Haus", "Hallo"]);
        }
    }

    #[test]
    fn empty_prefix_yields_nothing() {
        assert!(scenario(true).suggest("").is_empty());
        assert!(scenario(false).suggest("").is_empty());
    }

    #[test]
    fn scores_agree_between_paths() {
        let fast = scenario(true).suggest_scored("hau");
        let slow = scenario(false).suggest_scored("hau");
        assert_eq!(fast.len(), slow.len());
        for ((w1, s1), (w2, s2)) in fast.iter().zip(&slow) {
            assert_eq!(w1, w2);
            assert!((s1 - s2).abs() < 1e-9);
        }
    }

    #[test]
    fn no_dictionary_uses_builtin_words() {
        let s = Suggester::with_data(None, FrequencyTable::default(), &config());
        assert_eq!(s.dictionary_size(), {
            let unique: HashSet<&str> = FALLBACK_WORDS.iter().copied().collect();
            unique.len()
        });
        let results = s.suggest("üb");
        assert_eq!(results, vec!["über"]);
    }

    #[test]
    fn record_usage_ignores_empty_duplicates_and_malformed() {
        let mut s = scenario(true);
        s.record_usage("");
        s.record_usage("zwei Wörter");
        s.record_usage("Garten");
        s.record_usage("Garten");
        assert_eq!(s.history(), vec!["Garten"]);
        assert_eq!(s.suggest("gar"), vec!["Garten"]);
    }

    #[test]
    fn evicted_history_word_loses_its_boost() {
        let dict = AffixDictionary::from_texts("Wald\nWand\n", None);
        for accelerated in [true, false] {
            let mut s = Suggester::with_data(
                Some(dict.clone()),
                FrequencyTable::default(),
                &SuggesterConfig {
                    accelerated,
                    history_capacity: 1,
                    ..config()
                },
            );
            s.record_usage("Wand");
            assert_eq!(s.suggest("wa"), vec!["Wand", "Wald"]);
            s.record_usage("Wolke");
            assert_eq!(s.history(), vec!["Wolke"]);
            assert_eq!(s.suggest("wa"), vec!["Wald", "Wand"]);
            assert_eq!(s.suggest("wo"), vec!["Wolke"]);
        }
        let fast = scenario(true);
        let base = fast.ranking().base_score("Haus", true);
        assert_eq!(fast.packed_index().and_then(|t| t.score_of("Haus")), Some(base));
    }

    #[test]
    fn unavailable_engine_uses_fallback() {
        let mut s = scenario(true);
        if let Some(trie) = s.packed_index_mut() {
            trie.mark_unavailable();
        }
        assert!(!s.is_accelerated());
        assert_eq!(s.suggest("ha"), vec!["Haus", "Hallo", "Haustür"]);
        s.record_usage("Haustür");
        assert_eq!(s.suggest("ha"), vec!["Haustür", "Haus", "Hallo"]);
    }

    #[test]
    fn max_results_bounds_output() {
        let words: Vec<String> = (0..30).map(|i| format!("Wort{i:02}")).collect();
        let dict = AffixDictionary::from_texts(&words.join("\n"), None);
        for accelerated in [true, false] {
            let mut s = Suggester::with_data(
                Some(dict.clone()),
                FrequencyTable::default(),
                &SuggesterConfig {
                    accelerated,
                    ..config()
                },
            );
            assert_eq!(s.suggest("wort").len(), 10);
            s.set_max_results(3);
            assert_eq!(s.suggest("wort"), vec!["Wort00", "Wort01", "Wort02"]);
        }
    }

    #[test]
    fn fallback_expands_lemmas() {
        let aff = "SFX E Y 1\nSFX E 0 e .\n";
        let dict = AffixDictionary::from_texts("Tag/E\nTal\n", Some(aff));
        let s = Suggester::with_data(
            Some(dict),
            FrequencyTable::default(),
            &SuggesterConfig {
                accelerated: false,
                ..config()
            },
        );
        // Lemmas get the lemma bonus, so both come before the inflected form
        assert_eq!(s.suggest("ta"), vec!["Tag", "Tal", "Tage"]);
    }

    #[test]
    fn indexed_inflections_reach_the_packed_index() {
        let aff = "SFX E Y 1\nSFX E 0 e .\n";
        let dict = AffixDictionary::from_texts("Tag/E\n", Some(aff));
        let s = Suggester::with_data(
            Some(dict),
            FrequencyTable::default(),
            &SuggesterConfig {
                index_inflections: true,
                ..config()
            },
        );
        assert_eq!(s.suggest("tag"), vec!["Tag", "Tage"]);
        assert_eq!(s.prefix_index().get("tage").map(|t| t.lemma.as_str()), Some("Tag"));
    }

    #[test]
    fn compound_ranking_is_optional() {
        let dict = AffixDictionary::from_texts("Haus\nHaustür\nTür\nTüre\n", None);
        let mut s = Suggester::with_data(
            Some(dict),
            FrequencyTable::default(),
            &SuggesterConfig {
                accelerated: false,
                min_compound_part: 3,
                ..config()
            },
        );
        assert_eq!(s.suggest("haus"), vec!["Haus", "Haustür"]);
        s.set_rank_compounds(true);
        assert_eq!(s.suggest("haus"), vec!["Haus", "Haustür"]);
        let scored = s.suggest_scored("haus");
        assert!(scored[0].1 - scored[1].1 > 4.9);
    }

    #[test]
    fn shared_handle_serializes_updates() {
        let shared = SharedSuggester::new(scenario(true));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let s = shared.clone();
                std::thread::spawn(move || {
                    s.record_usage(&format!("Wort{i}"));
                    s.suggest("wort")
                })
            })
            .collect();
        for h in handles {
            assert!(!h.join().unwrap().is_empty());
        }
        assert_eq!(shared.read().history().len(), 4);
    }

    #[test]
    fn suggester_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Suggester>();
        assert_send_sync::<SharedSuggester>();
    }
}
