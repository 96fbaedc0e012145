// Candidate scoring
//
//   score = prefix_weight * len(prefix)
//         + ln(frequency(word) + 1)
//         + lemma_bonus      if the candidate is a lemma
//         + history_bonus    if the user typed it before
//         - compound_penalty if it is a compound
//         - long_compound_penalty if it is also longer than long_compound_len
//
// Lengths are in characters. The prefix term is the same for every
// candidate of one query, so it never changes the order within a query.

use serde::{Deserialize, Serialize};
use vorschlag_core::character::char_len;

use crate::frequency::FrequencyTable;

/// Score weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub prefix_weight: f64,
    pub lemma_bonus: f64,
    pub history_bonus: f64,
    pub compound_penalty: f64,
    pub long_compound_penalty: f64,
    /// Compounds longer than this (in characters) get the extra penalty.
    pub long_compound_len: usize,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            prefix_weight: 10.0,
            lemma_bonus: 2.0,
            history_bonus: 15.0,
            compound_penalty: 5.0,
            long_compound_penalty: 5.0,
            long_compound_len: 15,
        }
    }
}

impl RankingWeights {
    /// Little-endian bytes of every weight, for fingerprinting.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(6 * 8);
        for w in [
            self.prefix_weight,
            self.lemma_bonus,
            self.history_bonus,
            self.compound_penalty,
            self.long_compound_penalty,
        ] {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out.extend_from_slice(&(self.long_compound_len as u64).to_le_bytes());
        out
    }
}

/// Boolean signals about a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub is_compound: bool,
    pub is_lemma: bool,
    pub is_history: bool,
}

impl Signals {
    pub fn lemma() -> Self {
        Self {
            is_lemma: true,
            ..Self::default()
        }
    }
}

/// Turns frequency, prefix length and candidate signals into one score.
#[derive(Debug, Clone)]
pub struct RankingEngine {
    frequencies: FrequencyTable,
    weights: RankingWeights,
}

impl RankingEngine {
    pub fn new(frequencies: FrequencyTable, weights: RankingWeights) -> Self {
        Self {
            frequencies,
            weights,
        }
    }

    /// Full score of `word` as a completion of `prefix`.
    pub fn score(&self, word: &str, prefix: &str, signals: Signals) -> f64 {
        self.prefix_score(prefix) + self.signal_score(word, signals)
    }

    /// The prefix-independent part of the score, as precomputed for the
    /// packed index.
    pub fn base_score(&self, word: &str, is_lemma: bool) -> f64 {
        self.signal_score(
            word,
            Signals {
                is_lemma,
                ..Signals::default()
            },
        )
    }

    /// The fixed score a word typed by the user enters the packed index
    /// with: the maximum frequency term plus the lemma and history bonuses,
    /// above the base score of every word that is not in the history.
    pub fn history_score(&self) -> f64 {
        ((self.frequencies.sentinel() + 1) as f64).ln()
            + self.weights.lemma_bonus
            + self.weights.history_bonus
    }

    pub fn prefix_score(&self, prefix: &str) -> f64 {
        self.weights.prefix_weight * char_len(prefix) as f64
    }

    fn signal_score(&self, word: &str, signals: Signals) -> f64 {
        let mut score = (self.frequencies.frequency(word) as f64 + 1.0).ln();
        if signals.is_lemma {
            score += self.weights.lemma_bonus;
        }
        if signals.is_history {
            score += self.weights.history_bonus;
        }
        if signals.is_compound {
            score -= self.weights.compound_penalty;
            if char_len(word) > self.weights.long_compound_len {
                score -= self.weights.long_compound_penalty;
            }
        }
        score
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }
}
