//! German word completion.
//!
//! Given a typed prefix, [`Suggester`] returns a short ranked list of words
//! drawn from a dictionary, a frequency corpus and the words the user has
//! typed before.
//!
//! # Architecture
//!
//! - [`affix`] -- Hunspell-style affix rules (flags, conditions, PFX/SFX)
//! - [`dictionary`] -- Word list with affix flags; validity and expansion
//! - [`morphology`] -- [`MorphologicalExpander`]: validity, lemma expansion,
//!   compound splitting
//! - [`frequency`] -- [`FrequencyTable`]: corpus ranks
//! - [`ranking`] -- [`RankingEngine`]: the scoring formula
//! - [`history`] -- [`HistorySet`] and its append-only log
//! - [`config`] -- [`SuggesterConfig`], loadable from JSON
//! - [`suggester`] -- [`Suggester`] and the thread-safe [`SharedSuggester`]
//!
//! # Example
//!
//! ```
//! use vorschlag_de::{AffixDictionary, FrequencyTable, Suggester, SuggesterConfig};
//!
//! let dict = AffixDictionary::from_texts("Hallo\nHaus\nHaustür\n", None);
//! let freq = FrequencyTable::from_words(["Haus", "Hallo", "Haustür"], 10_000);
//! let mut suggester = Suggester::with_data(Some(dict), freq, &SuggesterConfig::default());
//!
//! assert_eq!(suggester.suggest("ha"), vec!["Haus", "Hallo", "Haustür"]);
//! suggester.record_usage("Haustür");
//! assert_eq!(suggester.suggest("ha"), vec!["Haustür", "Haus", "Hallo"]);
//! ```

pub mod affix;
pub mod builtin;
pub mod config;
pub mod dictionary;
pub mod frequency;
pub mod history;
pub mod morphology;
pub mod ranking;
pub mod suggester;

pub use config::{ConfigError, SuggesterConfig};
pub use dictionary::AffixDictionary;
pub use frequency::FrequencyTable;
pub use history::{HistoryLog, HistorySet};
pub use morphology::{Lexicon, MorphologicalExpander};
pub use ranking::{RankingEngine, RankingWeights, Signals};
pub use suggester::{SharedSuggester, Suggester};
