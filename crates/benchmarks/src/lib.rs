//! Benchmark history aggregation.
//!
//! This crate folds a freshly collected set of per-platform micro-benchmark
//! results into the published historical log, orders every platform's
//! records by commit recency, and renders a markdown regression report.
//!
//! # Quick Start
//!
//! ```no_run
//! use benchmark_history::{process, CommitOrder, ReportConfig, RunStamp};
//!
//! let config = ReportConfig::default();
//! let run = RunStamp::new("abcd12345678", Some("fix perf"));
//! let order = CommitOrder::from_git(".")?;
//!
//! let outcome = process(&config, &run, &order)?;
//! print!("{}", outcome.report);
//! # Ok::<(), benchmark_history::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`result`] - Raw and historical benchmark records
//! - [`history`] - The historical document and the merge of a run into it
//! - [`commits`] - Commit recency ordering
//! - [`group`] - Order-preserving grouping
//! - [`io`] - Reading artifacts, loading and storing history
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod commits;
pub mod error;
pub mod group;
pub mod history;
pub mod io;
pub mod markdown;
pub mod result;

pub use commits::CommitOrder;
pub use error::{Error, Result};
pub use history::HistoryDocument;
pub use result::{BenchmarkRecord, RawBenchmarkRecord, RunStamp};

use std::path::PathBuf;
use tracing::info;

/// Locations and switches for one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Directory holding one subdirectory of results per platform.
    pub artifacts_dir: PathBuf,
    /// Historical document, read and then overwritten.
    pub history_path: PathBuf,
    /// Render the report without writing the history back.
    pub dry_run: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from(io::ARTIFACTS_DIR),
            history_path: PathBuf::from(io::HISTORY_FILE),
            dry_run: false,
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The rendered markdown report.
    pub report: String,
    /// The merged, sorted document.
    pub history: HistoryDocument,
    /// Number of records appended by this run.
    pub appended: usize,
}

/// Ingest, merge, sort, render and persist.
///
/// The history file is only written once every earlier step has succeeded.
///
/// # Errors
///
/// Returns an error if any input is missing or malformed, if a record's
/// commit is absent from `order`, or if writing the history fails.
pub fn process(config: &ReportConfig, run: &RunStamp, order: &CommitOrder) -> Result<RunOutcome> {
    let new_data = io::read_artifacts(&config.artifacts_dir)?;
    let mut history = io::read_history(&config.history_path)?;

    let appended = history.merge_run(new_data, run);
    history.sort_by_recency(order)?;

    let report = markdown::render_report(&history);

    if config.dry_run {
        info!(path = %config.history_path.display(), "dry run, history not written");
    } else {
        io::write_history(&history, &config.history_path)?;
    }

    Ok(RunOutcome {
        report,
        history,
        appended,
    })
}
