//! Subprocess-backed translation agent.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{AgentOutput, AgentRequest, TranslationAgent};
use crate::config::AgentConfig;
use crate::error::AgentError;

/// Runs `program [args..] [model_flag model] <prompt>` in the request's
/// working directory and captures its output.
///
/// The child is killed if the request timeout elapses first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAgent {
    pub program: String,
    pub args: Vec<String>,
    pub model_flag: String,
}

impl CommandAgent {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            model_flag: "--model".to_string(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            model_flag: config.model_flag.clone(),
        }
    }

    fn command(&self, request: &AgentRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(model) = &request.model {
            cmd.arg(&self.model_flag).arg(model);
        }
        cmd.arg(&request.prompt)
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl TranslationAgent for CommandAgent {
    fn name(&self) -> &str {
        &self.program
    }

    async fn invoke(&self, request: &AgentRequest) -> Result<AgentOutput, AgentError> {
        let start = Instant::now();

        if !request.working_dir.is_dir() {
            return Err(AgentError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("working directory {:?} does not exist", request.working_dir),
            )));
        }

        let child = self.command(request).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AgentError::NotFound {
                    program: self.program.clone(),
                }
            } else {
                AgentError::Io(e)
            }
        })?;

        let output = tokio::time::timeout(request.timeout, child.wait_with_output())
            .await
            .map_err(|_| AgentError::Timeout {
                limit_ms: request.timeout.as_millis() as u64,
            })??;

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            program = %self.program,
            duration_ms = duration_ms,
            status = ?output.status,
            "agent process finished"
        );

        Ok(AgentOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms,
        })
    }
}
