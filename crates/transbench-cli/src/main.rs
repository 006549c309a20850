//! Transbench - translation agent benchmark CLI
//!
//! ## Commands
//!
//! - `run`: Mask sampled lines in every language directory and score the agent
//! - `candidates`: Count evaluable lines in one language directory
//! - `score`: Score a single hypothesis/reference pair
//! - `report`: Render the summary of an existing results file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

use transbench_core::{
    discover_languages, read_results_json, render_summary_md, write_results_json, AlignedCorpus,
    BenchConfig, ChrfScorer, CommandAgent, EditDistance, EvaluationHarness, ExampleSelector,
    LogFormat, Metric, RunReport,
};

/// Number of candidate indices printed by `candidates`.
const CANDIDATE_PREVIEW: usize = 10;

#[derive(Parser)]
#[command(name = "transbench")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Benchmark translation agents on masked aligned corpora", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark over every language directory
    Run {
        /// Directory holding one subdirectory per language
        #[arg(long)]
        corpus_dir: PathBuf,

        /// Examples evaluated per language
        #[arg(long)]
        count: Option<usize>,

        /// Per-invocation agent time limit in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Agent executable
        #[arg(long, env = "TRANSBENCH_AGENT")]
        agent: Option<String>,

        /// Model identifier passed to the agent
        #[arg(long, env = "TRANSBENCH_MODEL")]
        model: Option<String>,

        /// Seed for example sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Candidate threshold in characters (exclusive)
        #[arg(long)]
        min_chars: Option<usize>,

        /// Results file (default: next to the corpus directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show candidate lines for one language directory
    Candidates {
        #[arg(long)]
        lang_dir: PathBuf,

        #[arg(long)]
        min_chars: Option<usize>,
    },

    /// Score one hypothesis against one reference
    Score {
        #[arg(long)]
        hypothesis: String,

        #[arg(long)]
        reference: String,

        /// Maximum character n-gram order
        #[arg(long, default_value_t = 6)]
        n_max: usize,

        /// Recall weight
        #[arg(long, default_value_t = 2.0)]
        beta: f64,
    },

    /// Render the summary of a results file
    Report {
        #[arg(long)]
        results: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    transbench_core::init_tracing(format, level);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            corpus_dir,
            count,
            timeout_secs,
            agent,
            model,
            seed,
            min_chars,
            output,
        } => {
            let mut config = config;
            if let Some(count) = count {
                config.selection.examples_per_language = count;
            }
            if let Some(secs) = timeout_secs {
                config.agent.timeout_secs = secs;
            }
            if let Some(agent) = agent {
                config.agent.program = agent;
            }
            if model.is_some() {
                config.agent.model = model;
            }
            if seed.is_some() {
                config.selection.seed = seed;
            }
            if let Some(min_chars) = min_chars {
                config.selection.min_chars = min_chars;
            }
            cmd_run(&config, &corpus_dir, output.as_deref()).await
        }
        Commands::Candidates { lang_dir, min_chars } => {
            cmd_candidates(&config, &lang_dir, min_chars)
        }
        Commands::Score {
            hypothesis,
            reference,
            n_max,
            beta,
        } => cmd_score(&hypothesis, &reference, n_max, beta),
        Commands::Report { results } => cmd_report(&results),
    }
}

fn load_config(path: Option<&Path>) -> Result<BenchConfig> {
    match path {
        Some(path) => BenchConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(BenchConfig::default()),
    }
}

/// `<corpus_dir>/../<results_file>`, resolved against the real path so that
/// `.` and trailing `..` components name the actual parent directory.
fn default_results_path(corpus_dir: &Path, results_file: &str) -> Result<PathBuf> {
    let corpus_dir = corpus_dir
        .canonicalize()
        .with_context(|| format!("Failed to resolve {:?}", corpus_dir))?;
    let parent = corpus_dir.parent().unwrap_or(&corpus_dir);
    Ok(parent.join(results_file))
}

async fn cmd_run(config: &BenchConfig, corpus_dir: &Path, output: Option<&Path>) -> Result<()> {
    config.validate().context("Invalid configuration")?;
    if !corpus_dir.is_dir() {
        bail!("Corpus directory {:?} does not exist", corpus_dir);
    }

    let mut corpora = discover_languages(corpus_dir, &config.corpus.source_file)
        .with_context(|| format!("Failed to scan {:?}", corpus_dir))?;
    if corpora.is_empty() {
        warn!(dir = %corpus_dir.display(), "no language directories found");
    }

    let agent = CommandAgent::from_config(&config.agent);
    let harness = EvaluationHarness::new(agent, config).context("Invalid configuration")?;
    let report = harness.run(&mut corpora).await;

    let results_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_results_path(corpus_dir, &config.corpus.results_file)?,
    };
    write_results_json(&results_path, &report.results)
        .with_context(|| format!("Failed to write results to {:?}", results_path))?;
    info!(path = %results_path.display(), languages = report.results.len(), "results written");

    print_run_report(&report);
    println!("Results: {}", results_path.display());
    Ok(())
}

fn print_run_report(report: &RunReport) {
    print!("{}", render_summary_md(&report.results));
    if !report.skipped.is_empty() {
        println!("- skipped (insufficient data): {}", report.skipped.join(", "));
    }
    if !report.unscored.is_empty() {
        println!("- no predictions: {}", report.unscored.join(", "));
    }
    for (code, error) in &report.failed {
        println!("- failed: {} ({})", code, error);
    }
    println!();
    println!("Run:     {}", report.run_id);
    println!(
        "Elapsed: {}s",
        (report.finished_at - report.started_at).num_seconds()
    );
}

fn cmd_candidates(config: &BenchConfig, lang_dir: &Path, min_chars: Option<usize>) -> Result<()> {
    let corpus = AlignedCorpus::discover(lang_dir, &config.corpus.source_file)
        .with_context(|| format!("Failed to open language directory {:?}", lang_dir))?;
    let selector = ExampleSelector::new(min_chars.unwrap_or(config.selection.min_chars));
    let candidates = selector
        .find_candidates(&corpus)
        .context("Failed to read corpus files")?;

    println!("Language:   {}", corpus.code);
    println!("Source:     {}", corpus.source.path().display());
    println!("Target:     {}", corpus.target.path().display());
    println!("Candidates: {}", candidates.len());
    if !candidates.is_empty() {
        let preview: Vec<String> = candidates
            .iter()
            .take(CANDIDATE_PREVIEW)
            .map(|i| i.to_string())
            .collect();
        let more = if candidates.len() > CANDIDATE_PREVIEW {
            ", ..."
        } else {
            ""
        };
        println!("Indices:    {}{}", preview.join(", "), more);
    }
    if candidates.len() < config.selection.examples_per_language {
        println!(
            "Insufficient for a run of {} examples",
            config.selection.examples_per_language
        );
    }
    Ok(())
}

fn cmd_score(hypothesis: &str, reference: &str, n_max: usize, beta: f64) -> Result<()> {
    if n_max == 0 {
        bail!("--n-max must be at least 1");
    }
    if beta.is_nan() || beta <= 0.0 {
        bail!("--beta must be positive");
    }
    let chrf = ChrfScorer::new(n_max, beta);
    let metrics: [&dyn Metric; 2] = [&chrf, &EditDistance];
    for metric in metrics {
        println!("{}: {:.4}", metric.name(), metric.score(hypothesis, reference));
    }
    Ok(())
}

fn cmd_report(results: &Path) -> Result<()> {
    let results = read_results_json(results)
        .with_context(|| format!("Failed to read results from {:?}", results))?;
    print!("{}", render_summary_md(&results));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_results_path_is_beside_corpus() {
        let root = tempfile::tempdir().unwrap();
        let corpus = root.path().join("corpus");
        std::fs::create_dir(&corpus).unwrap();
        let expected = root.path().canonicalize().unwrap().join("benchmark_results.json");

        assert_eq!(
            default_results_path(&corpus, "benchmark_results.json").unwrap(),
            expected
        );
    }

    #[test]
    fn test_default_results_path_resolves_dot_components() {
        let root = tempfile::tempdir().unwrap();
        let corpus = root.path().join("corpus");
        std::fs::create_dir_all(corpus.join("mya")).unwrap();
        let expected = root.path().canonicalize().unwrap().join("out.json");

        assert_eq!(default_results_path(&corpus.join("."), "out.json").unwrap(), expected);
        assert_eq!(
            default_results_path(&corpus.join("mya").join(".."), "out.json").unwrap(),
            expected
        );
    }

    #[test]
    fn test_default_results_path_missing_dir_fails() {
        let root = tempfile::tempdir().unwrap();
        assert!(default_results_path(&root.path().join("missing"), "out.json").is_err());
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::try_parse_from([
            "transbench",
            "run",
            "--corpus-dir",
            "/data/corpus",
            "--count",
            "3",
            "--seed",
            "7",
            "--agent",
            "my-agent",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                count, seed, agent, ..
            } => {
                assert_eq!(count, Some(3));
                assert_eq!(seed, Some(7));
                assert_eq!(agent.as_deref(), Some("my-agent"));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_load_config_without_file_is_default() {
        assert_eq!(load_config(None).unwrap(), BenchConfig::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transbench.toml");
        std::fs::write(&path, "[selection]\nexamples_per_language = 4\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().selection.examples_per_language, 4);
    }
}
