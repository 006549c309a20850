//! Transbench Core Library
//!
//! Benchmarks an external translation agent against aligned line corpora:
//! a sampled target line is masked in place, the agent is asked to translate
//! the matching source line, the file is restored, and the prediction is
//! scored with chrF+ and normalized edit similarity.

pub mod agent;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fakes;
pub mod harness;
pub mod metrics;
pub mod obs;
pub mod reporting;
pub mod scoring;
pub mod telemetry;

pub use agent::{
    extract_translation, AgentFailure, AgentOutput, AgentRequest, AgentResponse, CommandAgent,
    PromptTemplate, TranslationAgent, DEFAULT_PROMPT_TEMPLATE,
};
pub use config::{AgentConfig, BenchConfig, CorpusConfig, SelectionConfig};
pub use corpus::{
    discover_languages, mask_line, restore_line, AlignedCorpus, CorpusFile, Example,
    ExampleSelector, FileDigest, MaskingSession,
};
pub use error::{AgentError, BenchError, CorpusError, Result};
pub use harness::{EvaluationHarness, LanguageOutcome, RunReport};
pub use metrics::METRICS;
pub use reporting::{
    read_results_json, render_summary_md, write_results_json, BenchmarkResults, LanguageSummary,
    ScoredResult,
};
pub use scoring::{chrf_plus, levenshtein, normalized_similarity, ChrfScorer, ChrfStats, EditDistance, Metric};
pub use telemetry::{init_tracing, LogFormat};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
