//! e2e-mcp Common Library
//!
//! Shared pieces of the Playwright proxy that do no process management:
//! - [`locator`]: resolves the runner's working directory
//! - [`extract`]: carves the JSON report out of mixed runner output
//! - [`outcome`]: the normalized run result
//! - [`summary`]: renders an outcome as a markdown text block

pub mod error;
pub mod extract;
pub mod locator;
pub mod outcome;
pub mod summary;

pub use error::{ExtractError, ExtractResult};
pub use extract::{carve_json, extract};
pub use locator::{find_report_dir, find_results_dir, TestDirLocator};
pub use outcome::{FailureDescriptor, RunOutcome};
pub use summary::render_summary;

/// Filenames that mark a directory as a Playwright project
pub const CONFIG_FILES: [&str; 3] = [
    "playwright.config.ts",
    "playwright.config.js",
    "playwright.config.mjs",
];

/// Conventional test-assets directory created by scaffolding
pub const E2E_DIR: &str = "e2e";

/// HTML report output directory
pub const REPORT_DIR: &str = "playwright-report";

/// Results/artifacts output directory
pub const RESULTS_DIR: &str = "test-results";

/// Installed-package marker checked before spawning the runner
pub const NODE_MODULES_DIR: &str = "node_modules";
