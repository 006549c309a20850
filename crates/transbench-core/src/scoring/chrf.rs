//! Character n-gram F-score (chrF+).
//!
//! The metric is not symmetric. Precision is normalised by the number of
//! hypothesis n-grams and recall by the number of reference n-grams, and the
//! F-beta combination weights recall `beta` times as much as precision. Swapping
//! hypothesis and reference swaps precision and recall, which changes the
//! score whenever `beta != 1`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Metric;

/// Averaged precision/recall and the resulting F-beta score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChrfStats {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
}

/// chrF+ scorer over orders `1..=n_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChrfScorer {
    pub n_max: usize,
    pub beta: f64,
}

impl Default for ChrfScorer {
    fn default() -> Self {
        Self {
            n_max: 6,
            beta: 2.0,
        }
    }
}

impl ChrfScorer {
    pub fn new(n_max: usize, beta: f64) -> Self {
        Self { n_max, beta }
    }

    /// Score `hypothesis` against `reference`, in `[0, 1]`.
    pub fn score(&self, hypothesis: &str, reference: &str) -> f64 {
        self.stats(hypothesis, reference).f_score
    }

    /// Full precision/recall breakdown.
    ///
    /// Precision averages orders `1..=min(n_max, |hypothesis|)` and recall
    /// averages orders `1..=min(n_max, |reference|)`, lengths counted in
    /// Unicode scalar values. An order the other side is too short for still
    /// counts, contributing 0. A side with no orders at all averages to 0.
    pub fn stats(&self, hypothesis: &str, reference: &str) -> ChrfStats {
        let hyp_bounds = char_bounds(hypothesis);
        let ref_bounds = char_bounds(reference);
        let hyp_len = hyp_bounds.len() - 1;
        let ref_len = ref_bounds.len() - 1;

        let hyp_orders = self.n_max.min(hyp_len);
        let ref_orders = self.n_max.min(ref_len);

        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;

        for n in 1..=hyp_orders.max(ref_orders) {
            let hyp_grams = ngram_counts(hypothesis, &hyp_bounds, n);
            let ref_grams = ngram_counts(reference, &ref_bounds, n);
            let matched = overlap(&hyp_grams, &ref_grams) as f64;

            if n <= hyp_orders {
                precision_sum += matched / (hyp_len + 1 - n) as f64;
            }
            if n <= ref_orders {
                recall_sum += matched / (ref_len + 1 - n) as f64;
            }
        }

        let precision = average(precision_sum, hyp_orders);
        let recall = average(recall_sum, ref_orders);

        ChrfStats {
            precision,
            recall,
            f_score: f_beta(precision, recall, self.beta),
        }
    }
}

impl Metric for ChrfScorer {
    fn name(&self) -> &str {
        "chrf"
    }

    fn score(&self, hypothesis: &str, reference: &str) -> f64 {
        ChrfScorer::score(self, hypothesis, reference)
    }
}

/// chrF+ with the default orders (6) and beta (2.0).
pub fn chrf_plus(hypothesis: &str, reference: &str) -> f64 {
    ChrfScorer::default().score(hypothesis, reference)
}

/// Byte offsets of every char boundary, including the end of the string.
fn char_bounds(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

fn ngram_counts<'a>(text: &'a str, bounds: &[usize], n: usize) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for window in bounds.windows(n + 1) {
        *counts.entry(&text[window[0]..window[n]]).or_insert(0) += 1;
    }
    counts
}

/// Multiset intersection size: each gram counts at most as often as it
/// appears on the rarer side.
fn overlap(hyp: &HashMap<&str, usize>, reference: &HashMap<&str, usize>) -> usize {
    hyp.iter()
        .map(|(gram, &count)| count.min(reference.get(gram).copied().unwrap_or(0)))
        .sum()
}

fn average(sum: f64, orders: usize) -> f64 {
    if orders == 0 {
        0.0
    } else {
        sum / orders as f64
    }
}

fn f_beta(precision: f64, recall: f64, beta: f64) -> f64 {
    if precision + recall == 0.0 {
        return 0.0;
    }
    let beta_sq = beta * beta;
    let denom = beta_sq * precision + recall;
    if denom == 0.0 {
        return 0.0;
    }
    (1.0 + beta_sq) * precision * recall / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_strings_score_one() {
        for text in ["a", "ab", "The cat sat.", "ကျမ်းစာ", "in the beginning God created"] {
            assert!(approx(chrf_plus(text, text), 1.0), "{text:?}");
        }
    }

    #[test]
    fn test_empty_strings_score_zero() {
        assert_eq!(chrf_plus("", ""), 0.0);
        assert_eq!(chrf_plus("", "abc"), 0.0);
        assert_eq!(chrf_plus("abc", ""), 0.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(chrf_plus("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_short_hypothesis_breakdown() {
        // Precision: orders 1..=2 fully matched.
        // Recall: order 1 = 2/3, order 2 = 1/2, order 3 = 0/1.
        let stats = ChrfScorer::default().stats("ab", "abc");
        assert!(approx(stats.precision, 1.0));
        assert!(approx(stats.recall, 7.0 / 18.0));

        let r = 7.0 / 18.0;
        let expected = 5.0 * r / (4.0 + r);
        assert!(approx(stats.f_score, expected));
    }

    #[test]
    fn test_metric_is_asymmetric() {
        let forward = chrf_plus("ab", "abc");
        let backward = chrf_plus("abc", "ab");
        assert!(backward > forward);

        let swapped = ChrfScorer::default().stats("abc", "ab");
        let original = ChrfScorer::default().stats("ab", "abc");
        assert!(approx(swapped.precision, original.recall));
        assert!(approx(swapped.recall, original.precision));
    }

    #[test]
    fn test_repeated_grams_are_clipped() {
        // Hypothesis "aaaa" has four 'a' unigrams; reference has one.
        let stats = ChrfScorer::new(1, 2.0).stats("aaaa", "a");
        assert!(approx(stats.precision, 0.25));
        assert!(approx(stats.recall, 1.0));
    }

    #[test]
    fn test_spaces_are_ordinary_characters() {
        let stats = ChrfScorer::new(1, 2.0).stats("a b", "ab");
        assert!(approx(stats.precision, 2.0 / 3.0));
        assert!(approx(stats.recall, 1.0));
    }

    #[test]
    fn test_zero_orders_scores_zero() {
        assert_eq!(ChrfScorer::new(0, 2.0).score("abc", "abc"), 0.0);
    }

    #[test]
    fn test_beta_one_is_symmetric() {
        let scorer = ChrfScorer::new(6, 1.0);
        assert!(approx(
            scorer.score("the cat", "the hat"),
            scorer.score("the hat", "the cat")
        ));
    }

    #[test]
    fn test_score_is_bounded() {
        let s = chrf_plus("partial overlap here", "partial match there");
        assert!(s > 0.0 && s < 1.0);
    }
}
