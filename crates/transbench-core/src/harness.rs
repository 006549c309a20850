//! Evaluation harness: mask, prompt, invoke, restore, score, aggregate.
//!
//! Languages and examples are processed strictly one at a time. For each
//! sampled line the target line is blanked, the agent is asked to translate
//! the source line (and may read the partially-masked corpus while doing so),
//! the line is restored, and the prediction is scored against the reference.
//!
//! Agent failures drop the example. Corpus I/O failures abort the language,
//! which is then left out of the results entirely.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::agent::{AgentRequest, AgentResponse, PromptTemplate, TranslationAgent};
use crate::config::BenchConfig;
use crate::corpus::{AlignedCorpus, Example, ExampleSelector, MaskingSession};
use crate::error::{AgentError, CorpusError, Result};
use crate::metrics::METRICS;
use crate::obs;
use crate::reporting::{BenchmarkResults, LanguageSummary, ScoredResult};
use crate::scoring::{normalized_similarity, ChrfScorer};

/// How one language's evaluation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageOutcome {
    /// Too few candidate lines; nothing was masked.
    Skipped { candidates: usize, requested: usize },
    /// Examples ran but none produced a prediction.
    Unscored { attempted: usize },
    Scored(LanguageSummary),
}

/// Everything a full run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: BenchmarkResults,
    /// Languages with insufficient candidates.
    pub skipped: Vec<String>,
    /// Languages where every example failed to produce a prediction.
    pub unscored: Vec<String>,
    /// Languages aborted by a corpus error, with the error message.
    pub failed: Vec<(String, String)>,
}

/// Runs translation agents against masked corpus lines.
pub struct EvaluationHarness<A> {
    agent: A,
    selector: ExampleSelector,
    chrf: ChrfScorer,
    prompt: PromptTemplate,
    examples_per_language: usize,
    timeout: Duration,
    model: Option<String>,
    seed: Option<u64>,
}

impl<A: TranslationAgent> EvaluationHarness<A> {
    pub fn new(agent: A, config: &BenchConfig) -> Result<Self> {
        config.validate()?;
        let prompt = match &config.agent.prompt_template {
            Some(template) => PromptTemplate::new(template.clone())?,
            None => PromptTemplate::default(),
        };
        Ok(Self {
            agent,
            selector: ExampleSelector::new(config.selection.min_chars),
            chrf: ChrfScorer::default(),
            prompt,
            examples_per_language: config.selection.examples_per_language,
            timeout: config.agent.timeout(),
            model: config.agent.model.clone(),
            seed: config.selection.seed,
        })
    }

    /// Override the chrF+ orders/beta.
    pub fn with_scorer(mut self, chrf: ChrfScorer) -> Self {
        self.chrf = chrf;
        self
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn selector(&self) -> &ExampleSelector {
        &self.selector
    }

    /// Evaluate every corpus in order. Never fails as a whole: per-language
    /// errors are logged and recorded in [`RunReport::failed`].
    pub async fn run(&self, corpora: &mut [AlignedCorpus]) -> RunReport {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let start = Instant::now();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        obs::emit_run_started(&run_id, corpora.len(), self.agent.name());

        let mut results = BenchmarkResults::default();
        let mut skipped = Vec::new();
        let mut unscored = Vec::new();
        let mut failed = Vec::new();

        for corpus in corpora.iter_mut() {
            let span = obs::language_span(&run_id, &corpus.code);
            let outcome = self.evaluate_language(corpus, &mut rng).instrument(span).await;
            match outcome {
                Ok(LanguageOutcome::Scored(summary)) => results.insert(summary),
                Ok(LanguageOutcome::Skipped { .. }) => skipped.push(corpus.code.clone()),
                Ok(LanguageOutcome::Unscored { .. }) => unscored.push(corpus.code.clone()),
                Err(e) => {
                    obs::emit_language_failed(&corpus.code, &e);
                    failed.push((corpus.code.clone(), e.to_string()));
                }
            }
        }

        obs::emit_run_finished(
            &run_id,
            start.elapsed().as_millis() as u64,
            results.len(),
            failed.len(),
        );
        METRICS.flush();

        RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            results,
            skipped,
            unscored,
            failed,
        }
    }

    /// Select, evaluate, and aggregate one language.
    pub async fn evaluate_language<R: Rng + ?Sized>(
        &self,
        corpus: &mut AlignedCorpus,
        rng: &mut R,
    ) -> Result<LanguageOutcome> {
        let requested = self.examples_per_language;
        obs::emit_language_started(&corpus.code, requested);

        let examples = self.selector.select(corpus, requested, rng)?;
        if examples.is_empty() {
            let candidates = self.selector.find_candidates(corpus)?.len();
            obs::emit_language_skipped(&corpus.code, candidates, requested);
            METRICS.inc_languages_skipped();
            return Ok(LanguageOutcome::Skipped {
                candidates,
                requested,
            });
        }

        let total = examples.len();
        let mut scored = Vec::with_capacity(total);
        for (position, example) in examples.iter().enumerate() {
            obs::emit_example_masked(&corpus.code, example.index, position + 1, total);
            if let Some(result) = self.evaluate_example(corpus, example).await? {
                scored.push(result);
            }
        }

        match LanguageSummary::from_results(corpus.code.clone(), scored) {
            Some(summary) => {
                obs::emit_language_finished(
                    &corpus.code,
                    summary.results.len(),
                    summary.avg_chrf,
                    summary.avg_edit_similarity,
                );
                Ok(LanguageOutcome::Scored(summary))
            }
            None => Ok(LanguageOutcome::Unscored { attempted: total }),
        }
    }

    /// One mask → prompt → invoke → restore → score cycle.
    ///
    /// `Ok(None)` means the agent gave no usable prediction. An `Err` means the
    /// corpus could not be masked or restored, or `example` was selected from
    /// a different target file.
    pub async fn evaluate_example(
        &self,
        corpus: &mut AlignedCorpus,
        example: &Example,
    ) -> Result<Option<ScoredResult>> {
        if example.target_file != corpus.target.path() {
            return Err(CorpusError::ForeignExample {
                example: example.target_file.clone(),
                target: corpus.target.path().to_path_buf(),
            }
            .into());
        }
        let session = MaskingSession::begin(&mut corpus.target, example.index)?;

        let request = AgentRequest {
            prompt: self.prompt.render(&example.source_text),
            working_dir: corpus.dir.clone(),
            model: self.model.clone(),
            timeout: self.timeout,
        };
        let response = self.invoke(&request).await;

        session.end()?;

        let Some(prediction) = response.prediction() else {
            match &response {
                AgentResponse::Failure(failure) => {
                    METRICS.inc_agent_failures();
                    obs::emit_no_prediction(&corpus.code, example.index, failure);
                }
                AgentResponse::Success(_) => {
                    obs::emit_no_prediction(&corpus.code, example.index, &"empty output");
                }
            }
            return Ok(None);
        };

        let result = self.score(example, prediction);
        obs::emit_example_scored(
            &corpus.code,
            example.index,
            result.chrf,
            result.edit_similarity,
        );
        METRICS.inc_examples_scored();
        Ok(Some(result))
    }

    /// Invoke the agent under the harness's own wall-clock limit.
    async fn invoke(&self, request: &AgentRequest) -> AgentResponse {
        METRICS.inc_agent_invocations();
        let result = match tokio::time::timeout(request.timeout, self.agent.invoke(request)).await {
            Ok(result) => result,
            Err(_) => Err(AgentError::Timeout {
                limit_ms: request.timeout.as_millis() as u64,
            }),
        };
        debug!(agent = %self.agent.name(), ok = result.is_ok(), "agent returned");
        AgentResponse::from(result)
    }

    fn score(&self, example: &Example, prediction: String) -> ScoredResult {
        let chrf = self.chrf.score(&prediction, &example.target_text);
        let edit_similarity = normalized_similarity(&prediction, &example.target_text);
        ScoredResult {
            index: example.index,
            source_text: example.source_text.clone(),
            predicted_text: prediction,
            reference_text: example.target_text.clone(),
            chrf,
            edit_similarity,
        }
    }
}
