//! Contract with the external translation agent.
//!
//! The agent is a black box: it receives a prompt and a working directory,
//! and either produces text or fails. Its raw result is folded into an
//! [`AgentResponse`] so the harness never has to propagate agent errors.

pub mod command;
pub mod prompt;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

pub use command::CommandAgent;
pub use prompt::{extract_translation, PromptTemplate, DEFAULT_PROMPT_TEMPLATE};

/// One translation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub prompt: String,
    /// Directory the agent runs in; it may read any file there, including
    /// the masked target file.
    pub working_dir: PathBuf,
    pub model: Option<String>,
    pub timeout: Duration,
}

/// Captured result of a finished agent process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    /// Exit code, `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl AgentOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A translation agent that can be invoked with a prompt.
#[async_trait]
pub trait TranslationAgent: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Run the agent once. Implementations should honour `request.timeout`;
    /// the harness also enforces it.
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentOutput, AgentError>;
}

/// Why an invocation produced no usable output.
#[derive(Debug, thiserror::Error)]
pub enum AgentFailure {
    #[error("agent exited with code {exit_code}: {stderr}")]
    Exit { exit_code: i32, stderr: String },

    #[error(transparent)]
    Invocation(#[from] AgentError),
}

/// Outcome of one agent call.
#[derive(Debug)]
pub enum AgentResponse {
    /// Raw stdout of a successful run.
    Success(String),
    Failure(AgentFailure),
}

/// Longest stderr excerpt kept in an [`AgentFailure::Exit`].
const STDERR_EXCERPT_CHARS: usize = 200;

impl From<Result<AgentOutput, AgentError>> for AgentResponse {
    fn from(result: Result<AgentOutput, AgentError>) -> Self {
        match result {
            Ok(output) if output.success() => AgentResponse::Success(output.stdout),
            Ok(output) => AgentResponse::Failure(AgentFailure::Exit {
                exit_code: output.exit_code,
                stderr: output.stderr.chars().take(STDERR_EXCERPT_CHARS).collect(),
            }),
            Err(e) => AgentResponse::Failure(e.into()),
        }
    }
}

impl AgentResponse {
    /// The translation carried by a successful response, if non-empty.
    pub fn prediction(&self) -> Option<String> {
        match self {
            AgentResponse::Success(stdout) => {
                let text = extract_translation(stdout);
                (!text.is_empty()).then_some(text)
            }
            AgentResponse::Failure(_) => None,
        }
    }
}
