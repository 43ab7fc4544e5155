//! Markdown rendering of a run outcome

use std::path::Path;

use comfy_table::{presets::ASCII_MARKDOWN, Table};

use crate::outcome::RunOutcome;
use crate::REPORT_DIR;

/// Raw output budget for the fallback section, in characters
pub const RAW_OUTPUT_LIMIT: usize = 2000;

/// Render `outcome` for a run executed in `work_dir`.
///
/// Pure: the same outcome and directory always render the same text.
pub fn render_summary(outcome: &RunOutcome, work_dir: &Path) -> String {
    let glyph = if outcome.success { "✅" } else { "❌" };
    let mut sections = vec![
        format!("# {glyph} Test Results"),
        metrics_table(outcome).to_string(),
    ];

    if !outcome.failures.is_empty() {
        let mut failed = String::from("## ❌ Failed Tests");
        for (i, failure) in outcome.failures.iter().enumerate() {
            failed.push_str(&format!(
                "\n\n### {}. {}\n```\n{}\n```",
                i + 1,
                failure.name,
                failure.error
            ));
        }
        sections.push(failed);
    }

    if let Some(raw) = outcome.raw_output.as_deref().filter(|raw| !raw.is_empty()) {
        if outcome.total_tests == 0 {
            let (shown, truncated) = truncate_chars(raw, RAW_OUTPUT_LIMIT);
            let notice = if truncated { "\n... (output truncated)" } else { "" };
            sections.push(format!("## Output\n```\n{shown}{notice}\n```"));
        }
    }

    sections.push(report_block(outcome, work_dir));
    sections.join("\n\n")
}

fn report_block(outcome: &RunOutcome, work_dir: &Path) -> String {
    match &outcome.report_dir {
        Some(report_dir) => format!(
            "## 📊 Test Report\n\
             HTML report generated: `{}`\n\n\
             View it with:\n\
             ```bash\n\
             cd {}\n\
             npx playwright show-report\n\
             ```\n\n\
             Or use the `e2e_report` tool to open it.",
            report_dir.display(),
            work_dir.display()
        ),
        None => format!(
            "## 📊 Test Report\n\
             Report directory: `{}`\n\n\
             If no report was generated, check that the tests actually ran.",
            work_dir.join(REPORT_DIR).display()
        ),
    }
}

fn metrics_table(outcome: &RunOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(vec!["Metric", "Value"]);

    table.add_row(vec!["Total".to_string(), outcome.total_tests.to_string()]);
    table.add_row(vec!["Passed".to_string(), outcome.passed.to_string()]);
    table.add_row(vec!["Failed".to_string(), outcome.failed.to_string()]);
    table.add_row(vec!["Skipped".to_string(), outcome.skipped.to_string()]);
    table.add_row(vec!["Pass rate".to_string(), format_pass_rate(outcome)]);
    if outcome.duration_ms > 0 {
        table.add_row(vec!["Duration".to_string(), format_duration(outcome.duration_ms)]);
    }

    table
}

/// `passed/total` as a percentage with one decimal, `0%` for an empty run
pub fn format_pass_rate(outcome: &RunOutcome) -> String {
    match outcome.pass_rate() {
        Some(rate) => format!("{rate:.1}%"),
        None => "0%".to_string(),
    }
}

/// Milliseconds under a second, otherwise seconds with one decimal
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms < 1000 {
        format!("{duration_ms}ms")
    } else {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    }
}

/// First `limit` characters of `text`, and whether anything was cut
fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}
