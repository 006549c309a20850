//! Scored results and the persisted results file.
//!
//! The JSON layout is consumed by downstream charting tools and must stay
//! stable: a map from language code to
//! `{ "verses": [...], "avg_chrf": f64, "avg_edit": f64 }`, where each verse
//! is `{ index, english, predicted, reference, chrf, edit_similarity }`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One example that was translated, restored, and scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredResult {
    pub index: usize,
    #[serde(rename = "english")]
    pub source_text: String,
    #[serde(rename = "predicted")]
    pub predicted_text: String,
    #[serde(rename = "reference")]
    pub reference_text: String,
    pub chrf: f64,
    pub edit_similarity: f64,
}

/// All scored examples for one language plus their averages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageSummary {
    /// Key of this summary in [`BenchmarkResults`]; not stored in the entry.
    #[serde(skip)]
    pub language_code: String,
    #[serde(rename = "verses")]
    pub results: Vec<ScoredResult>,
    pub avg_chrf: f64,
    #[serde(rename = "avg_edit")]
    pub avg_edit_similarity: f64,
}

impl LanguageSummary {
    /// Summarise `results`, or `None` when nothing was scored.
    pub fn from_results(language_code: impl Into<String>, results: Vec<ScoredResult>) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let n = results.len() as f64;
        let avg_chrf = results.iter().map(|r| r.chrf).sum::<f64>() / n;
        let avg_edit_similarity = results.iter().map(|r| r.edit_similarity).sum::<f64>() / n;
        Some(Self {
            language_code: language_code.into(),
            results,
            avg_chrf,
            avg_edit_similarity,
        })
    }
}

/// Per-language summaries keyed by language code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BenchmarkResults {
    pub languages: BTreeMap<String, LanguageSummary>,
}

impl BenchmarkResults {
    pub fn insert(&mut self, summary: LanguageSummary) {
        self.languages.insert(summary.language_code.clone(), summary);
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Every scored example across all languages.
    pub fn all_results(&self) -> impl Iterator<Item = &ScoredResult> {
        self.languages.values().flat_map(|s| s.results.iter())
    }
}

/// Write the results file as pretty JSON.
pub fn write_results_json(path: &Path, results: &BenchmarkResults) -> Result<()> {
    let content = serde_json::to_string_pretty(results)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Read a results file, restoring each summary's language code from its key.
pub fn read_results_json(path: &Path) -> Result<BenchmarkResults> {
    let raw = std::fs::read_to_string(path)?;
    let mut results: BenchmarkResults = serde_json::from_str(&raw)?;
    for (code, summary) in results.languages.iter_mut() {
        summary.language_code = code.clone();
    }
    Ok(results)
}

/// Markdown table of per-language averages plus overall means.
pub fn render_summary_md(results: &BenchmarkResults) -> String {
    let mut out = String::new();
    out.push_str("# Translation Benchmark Summary\n\n");

    if results.is_empty() {
        out.push_str("No languages were scored.\n");
        return out;
    }

    out.push_str("| Language | Scored | Avg chrF+ | Avg Edit Similarity |\n");
    out.push_str("|---|---:|---:|---:|\n");
    for (code, summary) in &results.languages {
        out.push_str(&format!(
            "| {} | {} | {:.4} | {:.4} |\n",
            code,
            summary.results.len(),
            summary.avg_chrf,
            summary.avg_edit_similarity
        ));
    }

    let (count, chrf_sum, edit_sum) = results
        .all_results()
        .fold((0usize, 0.0, 0.0), |(n, c, e), r| (n + 1, c + r.chrf, e + r.edit_similarity));
    let n = count.max(1) as f64;
    out.push_str(&format!(
        "\n- languages: {}\n- scored examples: {}\n- overall chrF+: {:.4}\n- overall edit similarity: {:.4}\n",
        results.len(),
        count,
        chrf_sum / n,
        edit_sum / n
    ));
    out
}
