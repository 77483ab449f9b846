//! I/O operations for benchmark results.
//!
//! This module reads fresh per-platform runner output from the artifacts
//! tree and loads and stores the historical document.

use crate::error::{Error, Result};
use crate::history::HistoryDocument;
use crate::result::RawBenchmarkRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default artifacts directory, one subdirectory per platform.
pub const ARTIFACTS_DIR: &str = "./artifacts";

/// Results file expected inside each platform directory.
pub const RESULTS_FILE: &str = "benchmarks_results.json";

/// Default path of the historical document.
pub const HISTORY_FILE: &str = "./gh-pages/v2/benchmark_results.json";

/// Read every platform's results from `dir`.
///
/// Each subdirectory name is a platform and must contain [`RESULTS_FILE`].
/// Plain files at the top level are ignored.
pub fn read_artifacts(dir: impl AsRef<Path>) -> Result<BTreeMap<String, Vec<RawBenchmarkRecord>>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut platforms = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;
        if !file_type.is_dir() {
            warn!(path = %path.display(), "skipping non-directory entry in artifacts");
            continue;
        }

        let platform = entry.file_name().to_string_lossy().into_owned();
        let results_path = path.join(RESULTS_FILE);
        let records: Vec<RawBenchmarkRecord> = read_json(&results_path)?;
        debug!(%platform, records = records.len(), "read platform results");
        platforms.insert(platform, records);
    }

    info!(platforms = platforms.len(), dir = %dir.display(), "ingested artifacts");
    Ok(platforms)
}

/// Load the historical document.
pub fn read_history(path: impl AsRef<Path>) -> Result<HistoryDocument> {
    let path = path.as_ref();
    let doc: HistoryDocument = read_json(path)?;
    info!(
        platforms = doc.len(),
        records = doc.record_count(),
        path = %path.display(),
        "loaded history"
    );
    Ok(doc)
}

/// Overwrite `path` with the document, pretty-printed with four-space indentation.
pub fn write_history(doc: &HistoryDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut ser).map_err(|e| Error::json(path, e))?;
    buf.push(b'\n');

    fs::write(path, buf).map_err(|e| Error::io(path, e))?;
    info!(records = doc.record_count(), path = %path.display(), "wrote history");
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::json(path, e))
}
