//! End-to-end tests for the `process-benchmark-data` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LINUX_RESULTS: &str = r#"[
    {"title": "Observable", "name": "map", "source": "rpp", "median(elapsed)": 0.0001},
    {"title": "Observable", "name": "map", "source": "rxcpp", "median(elapsed)": 0.00012}
]"#;

fn workspace(history: &str, commits: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("artifacts/linux")).unwrap();
    fs::write(root.join("artifacts/linux/benchmarks_results.json"), LINUX_RESULTS).unwrap();
    fs::create_dir_all(root.join("gh-pages/v2")).unwrap();
    fs::write(root.join("gh-pages/v2/benchmark_results.json"), history).unwrap();
    fs::write(root.join("commits.txt"), commits).unwrap();
    tmp
}

fn bin(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("process-benchmark-data").unwrap();
    cmd.current_dir(root)
        .env_remove("BENCH_ARTIFACTS_DIR")
        .env_remove("BENCH_HISTORY_FILE")
        .env_remove("BENCH_COMMITS_FILE")
        .env_remove("RUST_LOG");
    cmd
}

fn read_history(root: &Path) -> Value {
    let text = fs::read_to_string(root.join("gh-pages/v2/benchmark_results.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_first_run_into_empty_history() {
    let tmp = workspace("{}", "abcd1234\n");

    bin(tmp.path())
        .args(["abcd12345678", "fix perf\nmore text", "--commits-file", "commits.txt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# BENCHMARK RESULTS (AUTOGENERATED)"))
        .stdout(predicate::str::contains("## linux"))
        .stdout(predicate::str::contains("### Observable"))
        .stdout(predicate::str::contains("map | 120000.00 ns | 100000.00 ns | - | 0.00"));

    let history = read_history(tmp.path());
    let linux = history["linux"].as_array().unwrap();
    assert_eq!(linux.len(), 2);
    for record in linux {
        assert_eq!(record["commit"], "abcd1234");
        assert_eq!(record["commit_message"], "fix perf");
    }
    let medians: Vec<f64> = linux.iter().map(|r| r["median(elapsed)"].as_f64().unwrap()).collect();
    assert!((medians[0] - 100_000.0).abs() < 1e-6);
    assert!((medians[1] - 120_000.0).abs() < 1e-6);
}

#[test]
fn test_previous_run_feeds_ratio_column() {
    let history = r#"{
        "linux": [
            {"title": "Observable", "name": "map", "source": "rpp", "median(elapsed)": 50000.0,
             "commit": "abcd1234", "commit_message": "older"}
        ],
        "windows": [
            {"title": "Observable", "name": "map", "source": "rpp", "median(elapsed)": 7.0,
             "commit": "abcd1234", "commit_message": "older"}
        ]
    }"#;
    // the new run is the newest commit, so it sorts after the old one
    let tmp = workspace(history, "ffff0000\nabcd1234\n");

    bin(tmp.path())
        .args(["ffff0000aaaa", "--commits-file", "commits.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## windows"))
        .stdout(predicate::str::contains("map | 120000.00 ns | 100000.00 ns | 50000.00 ns | 2.00"))
        .stdout(predicate::str::contains("map | - | 7.00 ns | - | 0.00"));

    let history = read_history(tmp.path());
    let linux = history["linux"].as_array().unwrap();
    assert_eq!(linux.len(), 3);
    assert_eq!(linux[0]["commit"], "abcd1234");
    assert_eq!(linux[2]["commit"], "ffff0000");
    assert_eq!(linux[2]["commit_message"], "Current PR");
    assert_eq!(history["windows"].as_array().unwrap().len(), 1);
}

#[test]
fn test_unknown_commit_fails_without_writing() {
    let tmp = workspace("{}", "00000000\n");

    bin(tmp.path())
        .args(["abcd12345678", "--commits-file", "commits.txt"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("abcd1234"));

    assert_eq!(
        fs::read_to_string(tmp.path().join("gh-pages/v2/benchmark_results.json")).unwrap(),
        "{}"
    );
}

#[test]
fn test_malformed_artifact_fails() {
    let tmp = workspace("{}", "abcd1234\n");
    fs::write(tmp.path().join("artifacts/linux/benchmarks_results.json"), "[{").unwrap();

    bin(tmp.path())
        .args(["abcd1234", "--commits-file", "commits.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("benchmarks_results.json"));
}

#[test]
fn test_missing_history_fails() {
    let tmp = workspace("{}", "abcd1234\n");
    fs::remove_file(tmp.path().join("gh-pages/v2/benchmark_results.json")).unwrap();

    bin(tmp.path())
        .args(["abcd1234", "--commits-file", "commits.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("benchmark_results.json"));
}

#[test]
fn test_dry_run_keeps_history() {
    let tmp = workspace("{}", "abcd1234\n");

    bin(tmp.path())
        .args(["abcd1234", "--commits-file", "commits.txt", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("map | 120000.00 ns"));

    assert_eq!(
        fs::read_to_string(tmp.path().join("gh-pages/v2/benchmark_results.json")).unwrap(),
        "{}"
    );
}

#[test]
fn test_paths_from_environment() {
    let tmp = workspace("{}", "abcd1234\n");
    let other = TempDir::new().unwrap();

    bin(other.path())
        .env("BENCH_ARTIFACTS_DIR", tmp.path().join("artifacts"))
        .env("BENCH_HISTORY_FILE", tmp.path().join("gh-pages/v2/benchmark_results.json"))
        .env("BENCH_COMMITS_FILE", tmp.path().join("commits.txt"))
        .arg("abcd1234")
        .assert()
        .success();

    assert_eq!(read_history(tmp.path())["linux"].as_array().unwrap().len(), 2);
}

#[test]
fn test_runner_commit_fields_do_not_break_next_run() {
    let tmp = workspace("{}", "bbbb2222\naaaa1111\n");
    fs::write(
        tmp.path().join("artifacts/linux/benchmarks_results.json"),
        r#"[{"title": "Observable", "name": "map", "source": "rpp", "median(elapsed)": 1e-7,
             "commit": "runner", "commit_message": "from runner"}]"#,
    )
    .unwrap();

    bin(tmp.path())
        .args(["aaaa1111", "--commits-file", "commits.txt"])
        .assert()
        .success();
    bin(tmp.path())
        .args(["bbbb2222", "--commits-file", "commits.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("map | - | 100.00 ns | 100.00 ns | 1.00"));

    let linux = read_history(tmp.path())["linux"].as_array().unwrap().clone();
    assert_eq!(linux.len(), 2);
    assert_eq!(linux[0]["commit"], "aaaa1111");
    assert_eq!(linux[1]["commit"], "bbbb2222");
}

#[test]
fn test_platform_order_of_history_is_kept() {
    let history = r#"{
        "windows": [
            {"title": "Observable", "name": "map", "source": "rpp", "median(elapsed)": 7.0,
             "commit": "abcd1234", "commit_message": "older"}
        ]
    }"#;
    let tmp = workspace(history, "abcd1234\n");

    bin(tmp.path())
        .args(["abcd1234", "--commits-file", "commits.txt"])
        .assert()
        .success();

    let text = fs::read_to_string(tmp.path().join("gh-pages/v2/benchmark_results.json")).unwrap();
    let windows = text.find("\"windows\"").unwrap();
    let linux = text.find("\"linux\"").unwrap();
    assert!(windows < linux);
}
