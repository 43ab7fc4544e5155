//! e2e-mcp runner
//!
//! Drives an existing Playwright installation on behalf of a calling agent:
//! - Resolves the test directory and checks its dependencies
//! - Runs `npx playwright test` with JSON, HTML and list reporters
//! - Summarizes the JSON report into a markdown text block
//! - Opens the HTML report in a detached `show-report` process
//! - Scaffolds a new Playwright project
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TestRunner                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  run(test_dir?, &RunOptions) -> RunReport                   │
//! │    ├── TestDirLocator::locate()      (e2e-mcp-common)       │
//! │    ├── node_modules check                                   │
//! │    ├── PlaywrightCli::run_tests()    -> RawRun              │
//! │    └── extract(stdout, stderr, code) -> RunOutcome          │
//! │  open_report(test_dir?) -> ReportLaunch                     │
//! │    └── PlaywrightCli::show_report_detached()                │
//! │  init_project(project_dir, base_url?) -> ProjectScaffold    │
//! │    └── scaffold_project()                                   │
//! │                                                             │
//! │  *_text variants render the result or the error report      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod playwright;
pub mod runner;
pub mod scaffold;

pub use error::{E2eError, E2eResult};
pub use playwright::{PlaywrightCli, PlaywrightConfig, RawRun, RunOptions};
pub use runner::{ReportLaunch, RunReport, RunnerConfig, TestRunner, DEFAULT_REPORT_PORT};
pub use scaffold::{scaffold_project, ProjectScaffold, DEFAULT_BASE_URL};
