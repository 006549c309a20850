//! Process-wide benchmark counters.
//!
//! Counters are bumped at the call site and read back with [`Metrics::flush`],
//! which logs every value in one `tracing::info!` event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    lines_masked: AtomicU64,
    agent_invocations: AtomicU64,
    agent_failures: AtomicU64,
    examples_scored: AtomicU64,
    languages_skipped: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            lines_masked: AtomicU64::new(0),
            agent_invocations: AtomicU64::new(0),
            agent_failures: AtomicU64::new(0),
            examples_scored: AtomicU64::new(0),
            languages_skipped: AtomicU64::new(0),
        }
    }

    pub fn inc_lines_masked(&self) {
        self.lines_masked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_agent_invocations(&self) {
        self.agent_invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_agent_failures(&self) {
        self.agent_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_examples_scored(&self) {
        self.examples_scored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_languages_skipped(&self) {
        self.languages_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            lines_masked = self.lines_masked(),
            agent_invocations = self.agent_invocations(),
            agent_failures = self.agent_failures(),
            examples_scored = self.examples_scored(),
            languages_skipped = self.languages_skipped(),
        );
    }

    pub fn lines_masked(&self) -> u64 {
        self.lines_masked.load(Ordering::Relaxed)
    }

    pub fn agent_invocations(&self) -> u64 {
        self.agent_invocations.load(Ordering::Relaxed)
    }

    pub fn agent_failures(&self) -> u64 {
        self.agent_failures.load(Ordering::Relaxed)
    }

    pub fn examples_scored(&self) -> u64 {
        self.examples_scored.load(Ordering::Relaxed)
    }

    pub fn languages_skipped(&self) -> u64 {
        self.languages_skipped.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.lines_masked.store(0, Ordering::Relaxed);
        self.agent_invocations.store(0, Ordering::Relaxed);
        self.agent_failures.store(0, Ordering::Relaxed);
        self.examples_scored.store(0, Ordering::Relaxed);
        self.languages_skipped.store(0, Ordering::Relaxed);
    }
}
