// Suggester configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::frequency::DEFAULT_MAX_RANK;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::morphology::DEFAULT_MIN_COMPOUND_PART;
use crate::ranking::RankingWeights;
use vorschlag_index::DEFAULT_MAX_RESULTS;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything a [`Suggester`](crate::Suggester) is built from.
///
/// All fields have defaults, so a JSON config only needs the keys it
/// changes:
///
/// ```
/// use vorschlag_de::SuggesterConfig;
///
/// let config: SuggesterConfig =
///     serde_json::from_str(r#"{ "dictionary": "de_DE.dic", "max_results": 5 }"#).unwrap();
/// assert_eq!(config.max_results, 5);
/// assert!(config.accelerated);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggesterConfig {
    /// Word list (.dic). The built-in fallback list is used when absent.
    pub dictionary: Option<PathBuf>,
    /// Affix rules (.aff) for the word list.
    pub affix: Option<PathBuf>,
    /// Frequency corpus, one word per line, most frequent first.
    pub frequency: Option<PathBuf>,
    /// Append-only history log.
    pub history: Option<PathBuf>,
    /// Binary image of the packed index, rebuilt when stale.
    pub index_cache: Option<PathBuf>,
    pub history_capacity: usize,
    pub max_results: usize,
    pub max_rank: usize,
    pub min_compound_part: usize,
    /// Use the packed index when it is available.
    pub accelerated: bool,
    /// Also index the forms affix rules generate, under their lemma.
    pub index_inflections: bool,
    /// Apply the compound penalty on the fallback path.
    pub rank_compounds: bool,
    pub weights: RankingWeights,
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            affix: None,
            frequency: None,
            history: None,
            index_cache: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_results: DEFAULT_MAX_RESULTS,
            max_rank: DEFAULT_MAX_RANK,
            min_compound_part: DEFAULT_MIN_COMPOUND_PART,
            accelerated: true,
            index_inflections: false,
            rank_compounds: false,
            weights: RankingWeights::default(),
        }
    }
}

impl SuggesterConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill the resource paths from a data directory, keeping any path that
    /// is already set. Only files that exist are taken.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        fn pick(slot: &mut Option<PathBuf>, candidate: PathBuf) {
            if slot.is_none() && candidate.is_file() {
                *slot = Some(candidate);
            }
        }
        pick(&mut self.dictionary, dir.join("de_DE.dic"));
        pick(&mut self.affix, dir.join("de_DE.aff"));
        pick(&mut self.frequency, dir.join("frequency.txt"));
        if self.history.is_none() {
            self.history = Some(dir.join("history.txt"));
        }
        self
    }
}
