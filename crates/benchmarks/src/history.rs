// Copyright 2025 Benchmark History Contributors
// SPDX-License-Identifier: Apache-2.0

//! The historical results document and the merge of a fresh run into it.

use crate::commits::CommitOrder;
use crate::error::Result;
use crate::result::{BenchmarkRecord, RawBenchmarkRecord, RunStamp};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Per-platform record sequences, keyed by platform identifier.
///
/// Serializes as a plain JSON object mapping platform to an array of records.
/// Platforms keep the order they were read in; new ones are appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryDocument {
    platforms: Vec<(String, Vec<BenchmarkRecord>)>,
}

impl HistoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for `platform`, if any were ever stored.
    pub fn platform(&self, platform: &str) -> Option<&[BenchmarkRecord]> {
        self.platforms
            .iter()
            .find(|(name, _)| name == platform)
            .map(|(_, records)| records.as_slice())
    }

    /// Iterate platforms in document order with their records.
    pub fn platforms(&self) -> impl Iterator<Item = (&str, &[BenchmarkRecord])> {
        self.platforms
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Number of platforms in the document.
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    /// Whether the document holds no platforms.
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Total number of records across all platforms.
    pub fn record_count(&self) -> usize {
        self.platforms.iter().map(|(_, records)| records.len()).sum()
    }

    /// Records for `platform`, appending an empty entry if it is new.
    fn entry(&mut self, platform: String) -> &mut Vec<BenchmarkRecord> {
        let slot = match self.platforms.iter().position(|(name, _)| *name == platform) {
            Some(slot) => slot,
            None => {
                self.platforms.push((platform, Vec::new()));
                self.platforms.len() - 1
            }
        };
        &mut self.platforms[slot].1
    }

    /// Stamp and append a fresh run, creating platforms that are not yet present.
    ///
    /// Returns the number of records appended.
    pub fn merge_run(
        &mut self,
        new_data: BTreeMap<String, Vec<RawBenchmarkRecord>>,
        run: &RunStamp,
    ) -> usize {
        let mut appended = 0;
        for (platform, raw) in new_data {
            let count = raw.len();
            let records = self.entry(platform.clone());
            records.extend(raw.into_iter().map(|r| r.stamp(run)));
            appended += count;
            debug!(%platform, records = count, total = records.len(), "merged platform results");
        }
        info!(commit = %run.commit, records = appended, "merged run into history");
        appended
    }

    /// Reorder every platform oldest commit first, so the current run ends up last.
    ///
    /// The sort is stable, so records of one commit keep their order. All
    /// commits are ranked before anything is reordered, so on error the
    /// document is left as it was.
    pub fn sort_by_recency(&mut self, order: &CommitOrder) -> Result<()> {
        let ranked = self
            .platforms
            .iter()
            .map(|(_, records)| {
                records
                    .iter()
                    .map(|r| order.rank(&r.commit))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        for ((_, records), ranks) in self.platforms.iter_mut().zip(ranked) {
            let mut keyed: Vec<(usize, BenchmarkRecord)> =
                ranks.into_iter().zip(records.drain(..)).collect();
            keyed.sort_by_key(|(rank, _)| Reverse(*rank));
            records.extend(keyed.into_iter().map(|(_, r)| r));
        }

        debug!(platforms = self.platforms.len(), "sorted history by commit recency");
        Ok(())
    }
}

impl FromIterator<(String, Vec<BenchmarkRecord>)> for HistoryDocument {
    fn from_iter<I: IntoIterator<Item = (String, Vec<BenchmarkRecord>)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (platform, records) in iter {
            *doc.entry(platform) = records;
        }
        doc
    }
}

impl Serialize for HistoryDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.platforms.iter().map(|(name, records)| (name, records)))
    }
}

impl<'de> Deserialize<'de> for HistoryDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = HistoryDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of platform to benchmark records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut doc = HistoryDocument::new();
                while let Some((platform, records)) = map.next_entry::<String, Vec<BenchmarkRecord>>()? {
                    *doc.entry(platform) = records;
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
