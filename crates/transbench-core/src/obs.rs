//! Structured lifecycle events for a benchmark run.
//!
//! Every event is a single `tracing` record with an `event` field, so log
//! pipelines can filter on e.g. `event=example.scored`. Warnings carry the
//! language code and line index needed to reproduce the example.

use tracing::{info, warn};

/// Span covering one language's evaluation. Attach it with
/// [`tracing::Instrument`] so records emitted across `.await` points carry
/// `run_id` and `lang`.
///
/// ```ignore
/// evaluate(corpus).instrument(language_span(&run_id, "mya")).await
/// ```
pub fn language_span(run_id: &str, lang: &str) -> tracing::Span {
    tracing::info_span!("transbench.language", run_id = %run_id, lang = %lang)
}

pub fn emit_run_started(run_id: &str, languages: usize, agent: &str) {
    info!(event = "run.started", run_id = %run_id, languages = languages, agent = %agent);
}

pub fn emit_run_finished(run_id: &str, duration_ms: u64, scored_languages: usize, failed_languages: usize) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        scored_languages = scored_languages,
        failed_languages = failed_languages,
    );
}

pub fn emit_language_started(lang: &str, requested: usize) {
    info!(event = "language.started", lang = %lang, requested = requested);
}

pub fn emit_language_skipped(lang: &str, candidates: usize, requested: usize) {
    warn!(
        event = "language.skipped",
        lang = %lang,
        candidates = candidates,
        requested = requested,
        "insufficient candidate lines"
    );
}

pub fn emit_example_masked(lang: &str, index: usize, position: usize, total: usize) {
    info!(
        event = "example.masked",
        lang = %lang,
        index = index,
        position = position,
        total = total,
    );
}

pub fn emit_example_scored(lang: &str, index: usize, chrf: f64, edit_similarity: f64) {
    info!(
        event = "example.scored",
        lang = %lang,
        index = index,
        chrf = chrf,
        edit_similarity = edit_similarity,
    );
}

pub fn emit_no_prediction(lang: &str, index: usize, reason: &dyn std::fmt::Display) {
    warn!(event = "example.no_prediction", lang = %lang, index = index, reason = %reason);
}

pub fn emit_language_finished(lang: &str, scored: usize, avg_chrf: f64, avg_edit: f64) {
    info!(
        event = "language.finished",
        lang = %lang,
        scored = scored,
        avg_chrf = avg_chrf,
        avg_edit = avg_edit,
    );
}

pub fn emit_language_failed(lang: &str, error: &dyn std::fmt::Display) {
    tracing::error!(event = "language.failed", lang = %lang, error = %error);
}
