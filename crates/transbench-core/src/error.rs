//! Error taxonomy for transbench.
//!
//! Only corpus I/O and restoration failures are fatal, and only for the
//! language being evaluated. Agent failures are folded into
//! [`crate::agent::AgentResponse::Failure`] by the harness and never surface
//! as a [`BenchError`].

use std::path::PathBuf;

/// Errors produced while reading or rewriting an aligned corpus file.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {index} out of range for {path:?} ({line_count} lines)")]
    LineOutOfRange {
        path: PathBuf,
        index: usize,
        line_count: usize,
    },

    #[error("replacement for line {index} spans multiple lines")]
    MultiLineContent { index: usize },

    #[error("replacement for line {index} is missing its line terminator")]
    UnterminatedLine { index: usize },

    #[error("source file {name} not found in {dir:?}")]
    MissingSourceFile { dir: PathBuf, name: String },

    #[error("no target file found in {dir:?}")]
    MissingTargetFile { dir: PathBuf },

    #[error("example targets {example:?}, not the corpus target {target:?}")]
    ForeignExample { example: PathBuf, target: PathBuf },
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors produced while invoking the external translation agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("agent executable not found: {program}")]
    NotFound { program: String },

    #[error("agent timed out after {limit_ms}ms")]
    Timeout { limit_ms: u64 },

    #[error("agent io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level errors for the benchmark harness.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("target file {path:?} differs from its pre-mask state after restoring line {index}")]
    RestoreMismatch { path: PathBuf, index: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transbench operations.
pub type Result<T> = std::result::Result<T, BenchError>;
