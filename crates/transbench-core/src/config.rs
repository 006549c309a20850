//! Benchmark configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) yields
//! the standard run: 10 examples per language, a 10-character candidate
//! threshold, and `cursor-agent -p` with a 300 second limit.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// Example selection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Number of lines sampled and evaluated per language.
    pub examples_per_language: usize,
    /// Trimmed source and target lines must be longer than this.
    pub min_chars: usize,
    /// Fixed RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            examples_per_language: 10,
            min_chars: 10,
            seed: None,
        }
    }
}

/// External agent invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub program: String,
    /// Fixed arguments placed before the model flag and the prompt.
    pub args: Vec<String>,
    pub model: Option<String>,
    pub model_flag: String,
    /// Wall-clock limit per invocation.
    pub timeout_secs: u64,
    /// Replacement prompt; must contain `{translation_text}`.
    pub prompt_template: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            program: "cursor-agent".to_string(),
            args: vec!["-p".to_string()],
            model: None,
            model_flag: "--model".to_string(),
            timeout_secs: 300,
            prompt_template: None,
        }
    }
}

impl AgentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Corpus layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorpusConfig {
    /// Source-language file name, present in every language directory.
    pub source_file: String,
    /// Results file name, written next to the corpus root.
    pub results_file: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source_file: "eng-engULB.txt".to_string(),
            results_file: "benchmark_results.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchConfig {
    pub selection: SelectionConfig,
    pub agent: AgentConfig,
    pub corpus: CorpusConfig,
}

impl BenchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| BenchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| BenchError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.selection.examples_per_language == 0 {
            return Err(BenchError::Config(
                "selection.examples_per_language must be at least 1".to_string(),
            ));
        }
        if self.agent.timeout_secs == 0 {
            return Err(BenchError::Config(
                "agent.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.agent.program.trim().is_empty() {
            return Err(BenchError::Config("agent.program must not be empty".to_string()));
        }
        if self.corpus.source_file.trim().is_empty() {
            return Err(BenchError::Config(
                "corpus.source_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
