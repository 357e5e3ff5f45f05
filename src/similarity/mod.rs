#![warn(clippy::all, clippy::pedantic)]

use crate::{config::Config, index::CommandIndex, suggestion::RecommendationList};
use log::trace;
use strsim::{hamming, levenshtein};

/// Which heuristic admitted a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Hamming,
    Levenshtein,
    Anagram,
    Substring,
}

/// Finds commands in the index that look like a mistyped token.
///
/// Each index entry is tested against the rules in priority order and the
/// first rule that matches admits it. Results keep index order; they are not
/// ranked by score.
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    max_recommendations: usize,
    levenshtein_threshold: f64,
    hamming_ratio: f64,
    min_candidate_len: usize,
}

impl Default for SimilarityEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SimilarityEngine {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_recommendations: config.max_recommendations,
            levenshtein_threshold: config.levenshtein_threshold,
            hamming_ratio: config.hamming_ratio,
            min_candidate_len: config.min_candidate_len,
        }
    }

    /// Collect up to the recommendation cap of entries similar to `token`
    #[must_use]
    pub fn find(&self, token: &str, index: &CommandIndex) -> RecommendationList {
        let mut found = RecommendationList::with_capacity(self.max_recommendations);
        if token.is_empty() {
            return found;
        }

        for entry in index.iter() {
            if found.len() >= self.max_recommendations {
                break;
            }
            if let Some(rule) = self.classify(token, entry) {
                trace!("`{entry}` matches `{token}` by {rule:?}");
                found.push(entry);
            }
        }

        found
    }

    /// The first rule under which `entry` counts as similar to `token`
    #[must_use]
    pub fn classify(&self, token: &str, entry: &str) -> Option<MatchRule> {
        let entry_len = entry.chars().count();
        if entry_len < self.min_candidate_len {
            return None;
        }
        let token_len = token.chars().count();

        if token_len == entry_len {
            if let Ok(distance) = hamming(token, entry) {
                // Float comparison: odd lengths truncate, 5 chars allow 2 differences
                if as_f64(distance) <= self.hamming_ratio * as_f64(token_len) {
                    return Some(MatchRule::Hamming);
                }
            }
        }

        if normalized_levenshtein(token, entry) <= self.levenshtein_threshold {
            return Some(MatchRule::Levenshtein);
        }

        if are_anagrams(token, entry) {
            return Some(MatchRule::Anagram);
        }

        if entry.contains(token) {
            return Some(MatchRule::Substring);
        }

        None
    }
}

/// Edit distance divided by the longer of the two lengths
#[must_use]
pub fn normalized_levenshtein(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    as_f64(levenshtein(a, b)) / as_f64(longest)
}

/// Same length and the same multiset of bytes
#[must_use]
pub fn are_anagrams(a: &str, b: &str) -> bool {
    if a.len() != b.len() || a.chars().count() != b.chars().count() {
        return false;
    }

    let mut counts = [0i32; 256];
    for (x, y) in a.bytes().zip(b.bytes()) {
        counts[usize::from(x)] += 1;
        counts[usize::from(y)] -= 1;
    }
    counts.iter().all(|&count| count == 0)
}

fn as_f64(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}
