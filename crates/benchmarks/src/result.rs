// Copyright 2025 Benchmark History Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark record types.
//!
//! The runner emits [`RawBenchmarkRecord`]s with medians in seconds. The only
//! way to obtain a [`BenchmarkRecord`] from one is [`RawBenchmarkRecord::stamp`],
//! which rescales to nanoseconds, so a record cannot be converted twice.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nanoseconds per second, the factor applied to raw medians on ingestion.
pub const NANOS_PER_SECOND: f64 = 1e9;

/// Number of characters of the commit identifier kept on each record.
pub const COMMIT_ID_LEN: usize = 8;

/// Commit message recorded when the caller supplies none.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Current PR";

/// A measurement as written by the benchmark runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBenchmarkRecord {
    /// Benchmark suite name.
    pub title: String,
    /// Benchmark case name within the suite.
    pub name: String,
    /// Implementation that produced the measurement.
    pub source: String,
    /// Median elapsed time in seconds.
    #[serde(rename = "median(elapsed)")]
    pub median_secs: f64,
    /// Any further fields the runner emitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A measurement stored in the history document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Benchmark suite name.
    pub title: String,
    /// Benchmark case name within the suite.
    pub name: String,
    /// Implementation that produced the measurement.
    pub source: String,
    /// Median elapsed time in nanoseconds.
    #[serde(rename = "median(elapsed)")]
    pub median_ns: f64,
    /// Abbreviated commit the measurement was taken against.
    pub commit: String,
    /// First line of that commit's message.
    pub commit_message: String,
    /// Fields carried over from the raw record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identity of the run being merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    /// Commit identifier, truncated to [`COMMIT_ID_LEN`] characters.
    pub commit: String,
    /// First line of the commit message.
    pub message: String,
}

impl RunStamp {
    /// Build a stamp from the raw invocation arguments.
    pub fn new(commit: &str, message: Option<&str>) -> Self {
        let commit = commit.chars().take(COMMIT_ID_LEN).collect();
        let message = match message {
            Some(msg) => msg.lines().next().unwrap_or_default().to_string(),
            None => DEFAULT_COMMIT_MESSAGE.to_string(),
        };
        Self { commit, message }
    }
}

impl RawBenchmarkRecord {
    /// Attach the run's commit and convert the median to nanoseconds.
    ///
    /// Any `commit` or `commit_message` the runner emitted is replaced.
    pub fn stamp(mut self, run: &RunStamp) -> BenchmarkRecord {
        self.extra.remove("commit");
        self.extra.remove("commit_message");
        BenchmarkRecord {
            title: self.title,
            name: self.name,
            source: self.source,
            median_ns: self.median_secs * NANOS_PER_SECOND,
            commit: run.commit.clone(),
            commit_message: run.message.clone(),
            extra: self.extra,
        }
    }
}
