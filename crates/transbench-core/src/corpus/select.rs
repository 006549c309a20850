//! Candidate discovery and random example sampling.

use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::AlignedCorpus;
use crate::error::Result;

/// Immutable snapshot of one selected line pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Zero-based line index, shared by source and target.
    pub index: usize,
    /// Trimmed source line.
    pub source_text: String,
    /// Trimmed target line; the reference translation.
    pub target_text: String,
    /// File holding the target line that gets masked.
    pub target_file: PathBuf,
}

/// Picks evaluable line pairs from an [`AlignedCorpus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleSelector {
    /// Both trimmed lines must be strictly longer than this many characters.
    pub min_chars: usize,
}

impl Default for ExampleSelector {
    fn default() -> Self {
        Self { min_chars: 10 }
    }
}

impl ExampleSelector {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Whether a source/target pair is long enough to evaluate.
    pub fn is_candidate(&self, source: &str, target: &str) -> bool {
        source.trim().chars().count() > self.min_chars
            && target.trim().chars().count() > self.min_chars
    }

    /// All candidate indices in ascending order. Iteration stops at the
    /// shorter of the two files.
    pub fn find_candidates(&self, corpus: &AlignedCorpus) -> Result<Vec<usize>> {
        let source = corpus.source.read_lines()?;
        let target = corpus.target.read_lines()?;
        Ok(candidate_indices(self, &source, &target))
    }

    /// Draw `count` distinct candidates uniformly at random.
    ///
    /// Returns an empty vec when there are fewer than `count` candidates;
    /// the caller should skip the language.
    pub fn select<R: Rng + ?Sized>(
        &self,
        corpus: &AlignedCorpus,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Example>> {
        let source = corpus.source.read_lines()?;
        let target = corpus.target.read_lines()?;
        let candidates = candidate_indices(self, &source, &target);

        if candidates.len() < count {
            return Ok(Vec::new());
        }

        let examples = candidates
            .choose_multiple(rng, count)
            .map(|&index| Example {
                index,
                source_text: source[index].trim().to_string(),
                target_text: target[index].trim().to_string(),
                target_file: corpus.target.path().to_path_buf(),
            })
            .collect();
        Ok(examples)
    }
}

fn candidate_indices(selector: &ExampleSelector, source: &[String], target: &[String]) -> Vec<usize> {
    source
        .iter()
        .zip(target)
        .enumerate()
        .filter(|(_, (s, t))| selector.is_candidate(s, t))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_threshold_is_strict_and_trimmed() {
        let selector = ExampleSelector::new(10);
        // Exactly 10 characters after trimming is not enough.
        assert!(!selector.is_candidate("0123456789", "abcdefghijk"));
        assert!(!selector.is_candidate("   0123456789   ", "abcdefghijk"));
        assert!(selector.is_candidate("0123456789X", "abcdefghijk"));
    }

    #[test]
    fn test_threshold_counts_characters_not_bytes() {
        let selector = ExampleSelector::new(3);
        // Four Myanmar characters, twelve bytes.
        assert!(selector.is_candidate("ကခဂဃ", "abcd"));
        assert!(!selector.is_candidate("ကခဂ", "abcd"));
    }

    #[test]
    fn test_candidates_stop_at_shorter_side() {
        let selector = ExampleSelector::new(2);
        let source = lines(&["aaaa", "", "cccc", "dddd"]);
        let target = lines(&["xxxx", "yyyy", "zzzz"]);
        assert_eq!(candidate_indices(&selector, &source, &target), vec![0, 2]);
    }
}
