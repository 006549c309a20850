//! In-process [`TranslationAgent`] doubles (testing only).
//!
//! - `ScriptedAgent`: replays a queue of canned results and records requests
//! - `FnAgent`: delegates to a closure, e.g. to inspect the masked corpus
//! - `StallingAgent`: never answers before the harness timeout

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::agent::{AgentOutput, AgentRequest, TranslationAgent};
use crate::error::AgentError;

/// Successful output with the given stdout.
pub fn stdout_output(stdout: impl Into<String>) -> AgentOutput {
    AgentOutput {
        exit_code: 0,
        stdout: stdout.into(),
        stderr: String::new(),
        duration_ms: 1,
    }
}

/// `<translation>text</translation>` as successful output.
pub fn tagged_output(text: &str) -> AgentOutput {
    stdout_output(format!("<translation>{text}</translation>"))
}

// ---------------------------------------------------------------------------
// ScriptedAgent
// ---------------------------------------------------------------------------

/// Returns queued results in order; an exhausted script yields an I/O error.
#[derive(Debug, Default)]
pub struct ScriptedAgent {
    script: Mutex<VecDeque<Result<AgentOutput, AgentError>>>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, result: Result<AgentOutput, AgentError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn then_translate(self, text: &str) -> Self {
        self.then(Ok(tagged_output(text)))
    }

    pub fn then_exit(self, exit_code: i32, stderr: &str) -> Self {
        self.then(Ok(AgentOutput {
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
            duration_ms: 1,
        }))
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationAgent for ScriptedAgent {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, request: &AgentRequest) -> Result<AgentOutput, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(AgentError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "script exhausted",
            )))
        })
    }
}

// ---------------------------------------------------------------------------
// FnAgent
// ---------------------------------------------------------------------------

/// Agent backed by a synchronous closure.
pub struct FnAgent<F> {
    f: F,
}

impl<F> FnAgent<F>
where
    F: Fn(&AgentRequest) -> Result<AgentOutput, AgentError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> TranslationAgent for FnAgent<F>
where
    F: Fn(&AgentRequest) -> Result<AgentOutput, AgentError> + Send + Sync,
{
    fn name(&self) -> &str {
        "fn"
    }

    async fn invoke(&self, request: &AgentRequest) -> Result<AgentOutput, AgentError> {
        (self.f)(request)
    }
}

// ---------------------------------------------------------------------------
// StallingAgent
// ---------------------------------------------------------------------------

/// Sleeps for `delay` before answering.
#[derive(Debug, Clone)]
pub struct StallingAgent {
    pub delay: Duration,
}

#[async_trait]
impl TranslationAgent for StallingAgent {
    fn name(&self) -> &str {
        "stalling"
    }

    async fn invoke(&self, _request: &AgentRequest) -> Result<AgentOutput, AgentError> {
        tokio::time::sleep(self.delay).await;
        Ok(tagged_output("too late"))
    }
}
