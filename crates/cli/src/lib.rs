//! CLI for benchmark history aggregation.
//!
//! This crate provides the command-line entry point CI calls after the
//! benchmark jobs finish: it folds the collected artifacts into the
//! published history and prints the markdown report to stdout.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use benchmark_history::{io, CommitOrder, ReportConfig, RunStamp};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Merge benchmark artifacts into the history and print a regression report.
#[derive(Parser, Debug)]
#[command(name = "process-benchmark-data")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Commit the benchmarks were run against (truncated to 8 characters).
    #[arg(value_name = "COMMIT")]
    pub commit: String,

    /// Commit message; only the first line is kept.
    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Directory with one results subdirectory per platform.
    #[arg(long, env = "BENCH_ARTIFACTS_DIR", default_value = io::ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Historical results document to update.
    #[arg(long, env = "BENCH_HISTORY_FILE", default_value = io::HISTORY_FILE)]
    pub history: PathBuf,

    /// File listing commits newest first, one per line, instead of querying git.
    #[arg(long, env = "BENCH_COMMITS_FILE")]
    pub commits_file: Option<PathBuf>,

    /// Repository to query for the commit ordering.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Print the report without rewriting the history document.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Pipeline configuration derived from the arguments.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            artifacts_dir: self.artifacts_dir.clone(),
            history_path: self.history.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Stamp for the run being merged.
    pub fn run_stamp(&self) -> RunStamp {
        RunStamp::new(&self.commit, self.message.as_deref())
    }

    /// Commit ordering from `--commits-file`, or from git otherwise.
    pub fn commit_order(&self) -> Result<CommitOrder> {
        match &self.commits_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read commit list {}", path.display()))?;
                Ok(CommitOrder::parse(&text))
            }
            None => CommitOrder::from_git(&self.repo)
                .with_context(|| format!("failed to list commits in {}", self.repo.display())),
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI with the given arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if any stage fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let run = cli.run_stamp();
    let order = cli.commit_order()?;
    debug!(commit = %run.commit, known_commits = order.len(), "starting benchmark aggregation");

    let outcome = benchmark_history::process(&cli.report_config(), &run, &order)
        .context("failed to process benchmark results")?;

    print!("{}", outcome.report);
    Ok(())
}
