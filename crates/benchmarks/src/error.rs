// Copyright 2025 Benchmark History Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the benchmark history pipeline.
//!
//! Every failure is fatal for a run: the caller reports it and exits without
//! writing the history document.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while ingesting, merging or persisting results.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file did not contain the expected JSON shape.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse or serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// A record references a commit absent from the commit ordering.
    #[error("commit {commit} is not present in the commit ordering ({known} commits known)")]
    UnknownCommit {
        /// The unranked commit identifier.
        commit: String,
        /// Size of the ordering that was searched.
        known: usize,
    },

    /// The revision history query failed.
    #[error("git query failed: {0}")]
    Git(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for benchmark history operations.
pub type Result<T> = std::result::Result<T, Error>;
