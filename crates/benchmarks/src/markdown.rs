//! Markdown output generation for benchmark results.
//!
//! The report nests one collapsible section per platform, one per benchmark
//! title inside it, and a table with one row per benchmark name comparing the
//! `rpp` measurement against its previous commit and against `rxcpp`.

use crate::group::group_by;
use crate::history::HistoryDocument;
use crate::result::BenchmarkRecord;
use std::fmt::{self, Write};

/// Source whose measurements are tracked for regressions.
pub const TRACKED_SOURCE: &str = "rpp";

/// Source shown alongside for comparison.
pub const BASELINE_SOURCE: &str = "rxcpp";

/// First line of every report.
pub const REPORT_HEADER: &str = "# BENCHMARK RESULTS (AUTOGENERATED)";

/// Values rendered for a single benchmark name.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSummary {
    /// `rxcpp` median in the current commit group.
    pub baseline: Option<f64>,
    /// `rpp` median in the current commit group.
    pub current: Option<f64>,
    /// `rpp` median in the previous commit group.
    pub previous: Option<f64>,
    /// `current / previous`, when both exist and are non-zero.
    pub ratio: Option<f64>,
}

/// Reduce one benchmark name's records to a table row.
///
/// Records arrive oldest commit first. They are grouped by commit and the last
/// two groups are kept: the first of them is the previous run and the second
/// the current one. With a single group there is no previous run.
pub fn summarize(records: &[&BenchmarkRecord]) -> RowSummary {
    let by_commit = group_by(records.iter().copied(), |r| r.commit.clone());
    let tail = &by_commit[by_commit.len().saturating_sub(2)..];

    let (previous_group, current_group) = match tail {
        [prev, cur] => (Some(&prev.1), Some(&cur.1)),
        [cur] => (None, Some(&cur.1)),
        _ => (None, None),
    };

    let previous = previous_group.and_then(|g| metric(g, TRACKED_SOURCE));
    let current = current_group.and_then(|g| metric(g, TRACKED_SOURCE));
    let baseline = current_group.and_then(|g| metric(g, BASELINE_SOURCE));

    let ratio = match (current, previous) {
        (Some(cur), Some(prev)) if cur != 0.0 && prev != 0.0 => Some(cur / prev),
        _ => None,
    };

    RowSummary {
        baseline,
        current,
        previous,
        ratio,
    }
}

/// First median reported by `source` within a commit group.
fn metric(group: &[&BenchmarkRecord], source: &str) -> Option<f64> {
    group_by(group.iter().copied(), |r| r.source.clone())
        .into_iter()
        .find(|(s, _)| s == source)
        .and_then(|(_, members)| members.first().map(|r| r.median_ns))
}

/// Render a nanosecond value, or a dash when absent or zero.
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{v:.2} ns"),
        _ => "-".to_string(),
    }
}

/// Render one table row for `name`.
pub fn format_row(name: &str, row: &RowSummary) -> String {
    format!(
        "{} | {} | {} | {} | {:.2}",
        name,
        format_metric(row.baseline),
        format_metric(row.current),
        format_metric(row.previous),
        row.ratio.unwrap_or(0.0)
    )
}

/// Generate the full markdown report for a merged history document.
pub fn render_report(doc: &HistoryDocument) -> String {
    let mut output = String::new();
    write_report(&mut output, doc).expect("writing to a String cannot fail");
    output
}

/// Write the report into any formatter sink.
pub fn write_report<W: Write>(out: &mut W, doc: &HistoryDocument) -> fmt::Result {
    writeln!(out, "{REPORT_HEADER}")?;

    for (platform, records) in doc.platforms() {
        writeln!(out, "<details>\n<summary>\n\n## {platform}\n</summary>")?;

        for (title, title_records) in group_by(records, |r| r.title.clone()) {
            writeln!(out, "<details>\n<summary>\n\n### {title}\n</summary>\n\n")?;
            writeln!(out, "name | {BASELINE_SOURCE} | {TRACKED_SOURCE} | prev {TRACKED_SOURCE} | ratio")?;
            writeln!(out, "--- | --- | --- | --- | ---")?;

            for (name, name_records) in group_by(title_records.iter().copied(), |r| r.name.clone()) {
                writeln!(out, "{}", format_row(&name, &summarize(&name_records)))?;
            }
            writeln!(out, "\n</details>")?;
        }
        writeln!(out, "</details>")?;
    }

    Ok(())
}
