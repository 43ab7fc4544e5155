//! End-to-end scenarios for locating a project and summarizing its output
//!
//! Runner output here mimics `--reporter=json,html,list`: list reporter
//! lines before and after the JSON document.

use std::fs;
use std::path::Path;

use e2e_mcp_common::{extract, render_summary, RunOutcome, TestDirLocator};
use tempfile::TempDir;

fn runner_output(report: &serde_json::Value) -> String {
    format!(
        "\nRunning 2 tests using 1 worker\n\n  ✓  1 [chromium] › example.spec.ts:3:7 › loads (1.1s)\n{}\n  1 failed\n  1 passed (2.4s)\n",
        serde_json::to_string_pretty(report).unwrap()
    )
}

fn assert_counts_consistent(outcome: &RunOutcome) {
    assert_eq!(
        outcome.passed + outcome.failed + outcome.skipped,
        outcome.total_tests
    );
}

#[test]
fn scenario_one_pass_one_failure() {
    let report = serde_json::json!({
        "config": {"rootDir": "/work/e2e/tests"},
        "suites": [{
            "title": "example.spec.ts",
            "specs": [
                {"title": "loads", "tests": [{"results": [{"status": "passed"}]}]},
                {"title": "submits", "tests": [{"results": [
                    {"status": "failed", "error": {"message": "boom"}}
                ]}]}
            ]
        }],
        "stats": {"duration": 2400.0}
    });

    // Exit code 1 is ignored once the report parses.
    let outcome = extract(&runner_output(&report), "", Some(1));

    assert_eq!(outcome.total_tests, 2);
    assert_eq!(outcome.passed, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.skipped, 0);
    assert!(!outcome.success);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].name, "submits");
    assert_eq!(outcome.failures[0].error, "boom");
    assert!(outcome.raw_output.is_none());
    assert_counts_consistent(&outcome);

    let rendered = render_summary(&outcome, Path::new("/work/e2e"));
    assert!(rendered.contains("### 1. submits\n```\nboom\n```"));
    assert!(!rendered.contains("## Output"));
}

#[test]
fn scenario_nonzero_exit_without_failures_reads_success() {
    let report = serde_json::json!({
        "suites": [{"specs": [{"title": "ok", "tests": [{"results": [{"status": "passed"}]}]}]}],
        "errors": [{"message": "globalTeardown threw"}]
    });

    let outcome = extract(&runner_output(&report), "", Some(1));
    assert!(outcome.success);
    assert_eq!(outcome.passed, 1);
}

#[test]
fn scenario_no_json_falls_back_to_exit_code() {
    let stdout = "Error: No tests found.\nMake sure that arguments are regular expressions\n";

    let failed = extract(stdout, "", Some(1));
    assert!(!failed.success);
    assert_eq!(
        (failed.total_tests, failed.passed, failed.failed, failed.skipped),
        (0, 0, 0, 0)
    );
    assert_eq!(failed.raw_output.as_deref(), Some(stdout));

    let clean = extract(stdout, "", Some(0));
    assert!(clean.success);

    let rendered = render_summary(&failed, Path::new("/work/e2e"));
    assert!(rendered.contains("## Output\n```\nError: No tests found."));
}

#[test]
fn scenario_empty_results_count_as_skipped() {
    let report = serde_json::json!({
        "suites": [{"specs": [
            {"title": "not run", "tests": [{"results": []}]},
            {"title": "no results key", "tests": [{}]}
        ]}]
    });

    let outcome = extract(&runner_output(&report), "", Some(0));
    assert_eq!(outcome.total_tests, 2);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(outcome.failed, 0);
    assert!(outcome.failures.is_empty());
    assert_counts_consistent(&outcome);
}

#[test]
fn scenario_no_marker_anywhere_is_not_found() {
    let tmp = TempDir::new().unwrap();
    for dir in ["e2e", "tests", "test"] {
        fs::create_dir_all(tmp.path().join(dir)).unwrap();
        fs::write(tmp.path().join(dir).join("package.json"), "{}").unwrap();
    }

    assert_eq!(TestDirLocator::new(tmp.path()).locate(None, &[]), None);
}

#[test]
fn scenario_explicit_dir_uses_nested_e2e() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("webapp");
    fs::create_dir_all(project.join("e2e")).unwrap();
    fs::write(project.join("e2e/playwright.config.ts"), "").unwrap();

    let locator = TestDirLocator::new(tmp.path());
    assert_eq!(
        locator.locate(Some(project.as_path()), &[]),
        Some(project.join("e2e"))
    );
}
