//! Playwright JSON report extraction
//!
//! The runner is invoked with several reporters at once, so the JSON
//! report arrives on stdout interleaved with `list` reporter lines and
//! whatever the project's setup code logs. Rather than parse the whole
//! stream, the first balanced `{ ... }` span is carved out and parsed as a
//! generic value, then the suite tree is walked into a [`RunOutcome`].

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::outcome::{FailureDescriptor, RunOutcome, Tally, TestStatus};

const UNKNOWN_ERROR: &str = "Unknown error";

/// Summarize raw runner output.
///
/// Never fails: when no report can be recovered the outcome carries the
/// raw output (stdout, or stderr when stdout is empty) and takes its
/// success flag from `exit_code`.
pub fn extract(stdout: &str, stderr: &str, exit_code: Option<i32>) -> RunOutcome {
    match parse_report(stdout) {
        Ok(outcome) => {
            debug!(
                "Parsed report: {} total, {} failed",
                outcome.total_tests, outcome.failed
            );
            outcome
        }
        Err(e) => {
            warn!("No structured report in runner output: {}", e);
            let raw = if stdout.is_empty() { stderr } else { stdout };
            RunOutcome::unparsed(raw, exit_code)
        }
    }
}

/// Parse the first JSON object embedded in `output` and walk it
pub fn parse_report(output: &str) -> ExtractResult<RunOutcome> {
    let document: Value = serde_json::from_str(carve_json(output)?)?;
    Ok(summarize(&document))
}

/// Return the first brace-balanced span starting at the first `{`.
///
/// Braces are counted without regard to JSON strings; a brace inside a
/// string literal before the report ends will skew the span, and the
/// subsequent parse fails into the fallback.
pub fn carve_json(output: &str) -> ExtractResult<&str> {
    let start = output.find('{').ok_or(ExtractError::NoJsonStart)?;

    let mut depth = 0usize;
    for (offset, byte) in output.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&output[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unbalanced { start })
}

/// Walk a parsed report document into an outcome
pub fn summarize(document: &Value) -> RunOutcome {
    let mut tally = Tally::default();
    for suite in array(document, "suites") {
        walk_suite(suite, &mut tally);
    }

    let duration_ms = document
        .get("stats")
        .and_then(|stats| stats.get("duration"))
        .and_then(Value::as_f64)
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| ms.round() as u64)
        .unwrap_or(0);

    tally.into_outcome(duration_ms)
}

fn walk_suite(suite: &Value, tally: &mut Tally) {
    for spec in array(suite, "specs") {
        for test in array(spec, "tests") {
            let first = array(test, "results").first();
            let status = TestStatus::classify(
                first.and_then(|result| result.get("status")).and_then(Value::as_str),
            );

            tally.record(status, || FailureDescriptor {
                name: spec
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                error: first
                    .and_then(|result| result.get("error"))
                    .and_then(|error| error.get("message"))
                    .and_then(Value::as_str)
                    .filter(|message| !message.is_empty())
                    .unwrap_or(UNKNOWN_ERROR)
                    .to_string(),
            });
        }
    }

    for child in array(suite, "suites") {
        walk_suite(child, tally);
    }
}

/// `value[key]` as a slice, empty when absent or not an array
fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
