// Copyright 2025 Benchmark History Contributors
// SPDX-License-Identifier: Apache-2.0

//! Commit recency ordering.
//!
//! The ordering is supplied from outside the history (normally the output of
//! `git rev-list`, newest first) and is used only to rank records. Every
//! commit ever recorded must appear in it; ranking an unknown commit is an
//! error rather than a silent default.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Newest-first list of abbreviated commit identifiers.
#[derive(Debug, Clone, Default)]
pub struct CommitOrder {
    commits: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl CommitOrder {
    /// Build an ordering from identifiers listed newest first.
    ///
    /// If an identifier repeats, its first position is its rank.
    pub fn new<I, S>(commits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let commits: Vec<String> = commits.into_iter().map(Into::into).collect();
        let mut ranks = HashMap::with_capacity(commits.len());
        for (pos, commit) in commits.iter().enumerate() {
            ranks.entry(commit.clone()).or_insert(pos);
        }
        Self { commits, ranks }
    }

    /// Parse one identifier per line, ignoring blank lines.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    /// Query `git rev-list` in `repo_dir` for the topological history of `HEAD`.
    ///
    /// Identifiers are abbreviated to at least eight characters so they line
    /// up with the identifiers stamped on records.
    pub fn from_git(repo_dir: impl AsRef<Path>) -> Result<Self> {
        let repo_dir = repo_dir.as_ref();
        let output = Command::new("git")
            .args(["rev-list", "--topo-order", "--abbrev-commit", "--abbrev=8", "HEAD"])
            .current_dir(repo_dir)
            .output()
            .map_err(|e| Error::Git(format!("failed to spawn git in {}: {e}", repo_dir.display())))?;

        if !output.status.success() {
            return Err(Error::Git(format!(
                "git rev-list exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let order = Self::parse(&String::from_utf8_lossy(&output.stdout));
        debug!(commits = order.len(), repo = %repo_dir.display(), "loaded commit ordering from git");
        Ok(order)
    }

    /// Position of `commit` in the ordering; 0 is the newest.
    pub fn rank(&self, commit: &str) -> Result<usize> {
        self.ranks
            .get(commit)
            .copied()
            .ok_or_else(|| Error::UnknownCommit {
                commit: commit.to_string(),
                known: self.commits.len(),
            })
    }

    /// Number of commits in the ordering.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Whether the ordering is empty.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Identifiers, newest first.
    pub fn commits(&self) -> &[String] {
        &self.commits
    }
}
