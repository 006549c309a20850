//! Text-similarity metrics used to score agent output against references.
//!
//! - [`chrf`]: character n-gram F-score (chrF+)
//! - [`edit`]: Levenshtein distance and normalized edit similarity

pub mod chrf;
pub mod edit;

pub use chrf::{chrf_plus, ChrfScorer, ChrfStats};
pub use edit::{levenshtein, normalized_similarity, EditDistance};

/// A similarity metric comparing a hypothesis against a reference.
///
/// Implementations return a value in `[0, 1]`, where 1.0 is a perfect match.
/// Arguments are ordered; a metric need not be symmetric.
pub trait Metric: Send + Sync {
    /// Name used in reports and log fields.
    fn name(&self) -> &str;

    fn score(&self, hypothesis: &str, reference: &str) -> f64;
}
