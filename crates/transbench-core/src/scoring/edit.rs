//! Levenshtein edit distance over Unicode scalar values.

use super::Metric;

/// Minimum number of single-character inserts, deletes and substitutions
/// needed to turn `a` into `b`.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rolling rows of the DP table, indexed by position in `b`.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - distance / max(len(a), len(b), 1)`, in `[0, 1]`.
///
/// Two empty strings are identical (1.0); an empty string against a
/// non-empty one scores 0.0.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count()).max(1);
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Normalized edit similarity as a [`Metric`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance;

impl Metric for EditDistance {
    fn name(&self) -> &str {
        "edit_similarity"
    }

    fn score(&self, hypothesis: &str, reference: &str) -> f64 {
        normalized_similarity(hypothesis, reference)
    }
}
