//! Operation layer: locate, check, invoke, summarize
//!
//! The `*_text` entry points are the operation boundary. Every failure is
//! converted to a displayable explanation there, so callers always get a
//! single text block back.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use e2e_mcp_common::{
    extract, find_report_dir, find_results_dir, render_summary, RunOutcome, TestDirLocator,
    NODE_MODULES_DIR, REPORT_DIR,
};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightCli, PlaywrightConfig, RunOptions};
use crate::scaffold::{scaffold_project, ProjectScaffold, DEFAULT_BASE_URL};

/// Port `playwright show-report` listens on by default
pub const DEFAULT_REPORT_PORT: u16 = 9323;

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory relative paths and conventional lookups start from
    pub cwd: PathBuf,

    /// Extra locator search paths, tried after an explicit directory
    pub search_paths: Vec<PathBuf>,

    pub playwright: PlaywrightConfig,

    /// Base URL written into scaffolded configs when none is given
    pub base_url: String,

    /// Port advertised for the report server
    pub report_port: u16,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            search_paths: Vec::new(),
            playwright: PlaywrightConfig::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            report_port: DEFAULT_REPORT_PORT,
        }
    }
}

/// A finished run and where it ran
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub work_dir: PathBuf,
    pub outcome: RunOutcome,
    /// Artifacts directory (traces, screenshots, videos), if produced
    pub results_dir: Option<PathBuf>,
}

impl RunReport {
    pub fn render(&self) -> String {
        render_summary(&self.outcome, &self.work_dir)
    }
}

/// A report server that was launched
#[derive(Debug, Clone)]
pub struct ReportLaunch {
    pub work_dir: PathBuf,
    pub report_dir: PathBuf,
    pub url: String,
    pub pid: Option<u32>,
}

impl ReportLaunch {
    pub fn render(&self) -> String {
        format!(
            "✅ Opening test report...

📁 Report directory: `{}`
🌐 The browser should open automatically

If it does not, visit: {}

Or run manually:
```bash
cd {}
npx playwright show-report
```",
            self.report_dir.display(),
            self.url,
            self.work_dir.display()
        )
    }
}

/// Playwright proxy bound to one working directory and configuration
#[derive(Debug, Clone)]
pub struct TestRunner {
    locator: TestDirLocator,
    search_paths: Vec<PathBuf>,
    playwright: PlaywrightCli,
    base_url: String,
    report_port: u16,
}

impl TestRunner {
    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            locator: TestDirLocator::new(config.cwd),
            search_paths: config.search_paths,
            playwright: PlaywrightCli::new(config.playwright),
            base_url: config.base_url,
            report_port: config.report_port,
        }
    }

    pub fn cwd(&self) -> &Path {
        self.locator.cwd()
    }

    /// Resolve the runner's working directory
    pub fn locate(&self, test_dir: Option<&Path>) -> E2eResult<PathBuf> {
        self.locator
            .locate(test_dir, &self.search_paths)
            .ok_or_else(|| E2eError::TestDirNotFound {
                cwd: self.cwd().to_path_buf(),
            })
    }

    /// Run the suite and summarize its report
    pub async fn run(&self, test_dir: Option<&Path>, options: &RunOptions) -> E2eResult<RunReport> {
        let work_dir = self.locate(test_dir)?;

        if !work_dir.join(NODE_MODULES_DIR).is_dir() {
            return Err(E2eError::DependenciesMissing { dir: work_dir });
        }

        info!("Running Playwright tests in {}", work_dir.display());
        let raw = self.playwright.run_tests(&work_dir, options).await?;
        let outcome = extract(&raw.stdout, &raw.stderr, raw.exit_code)
            .with_report_dir(find_report_dir(&work_dir));

        if outcome.raw_output.is_some() {
            warn!("Run summarized from raw output (exit code {:?})", raw.exit_code);
        } else {
            info!(
                "Test results: {} passed, {} failed, {} skipped ({} ms)",
                outcome.passed, outcome.failed, outcome.skipped, outcome.duration_ms
            );
        }

        Ok(RunReport {
            results_dir: find_results_dir(&work_dir),
            work_dir,
            outcome,
        })
    }

    /// [`Self::run`], rendered
    pub async fn run_text(&self, test_dir: Option<&Path>, options: &RunOptions) -> String {
        match self.run(test_dir, options).await {
            Ok(report) => report.render(),
            Err(e) => {
                warn!("Test run failed: {}", e);
                e.to_report()
            }
        }
    }

    /// Launch the HTML report server for an existing report
    pub fn open_report(&self, test_dir: Option<&Path>) -> E2eResult<ReportLaunch> {
        let work_dir = self.locate(test_dir)?;

        let report_dir = find_report_dir(&work_dir).ok_or_else(|| E2eError::ReportMissing {
            expected: work_dir.join(REPORT_DIR),
            work_dir: work_dir.clone(),
        })?;

        let pid = self.playwright.show_report_detached(&work_dir)?;
        debug!("Report server for {} has pid {:?}", report_dir.display(), pid);

        Ok(ReportLaunch {
            url: format!("http://localhost:{}", self.report_port),
            work_dir,
            report_dir,
            pid,
        })
    }

    /// [`Self::open_report`], rendered
    pub fn open_report_text(&self, test_dir: Option<&Path>) -> String {
        match self.open_report(test_dir) {
            Ok(launch) => launch.render(),
            Err(e) => {
                warn!("Open report failed: {}", e);
                e.to_report()
            }
        }
    }

    /// Scaffold a Playwright project under `project_dir`
    pub fn init_project(&self, project_dir: &Path, base_url: Option<&str>) -> E2eResult<ProjectScaffold> {
        let project_dir = if project_dir.is_absolute() {
            project_dir.to_path_buf()
        } else {
            self.cwd().join(project_dir)
        };
        scaffold_project(&project_dir, base_url.unwrap_or(&self.base_url))
    }

    /// [`Self::init_project`], rendered
    pub fn init_project_text(&self, project_dir: &Path, base_url: Option<&str>) -> String {
        match self.init_project(project_dir, base_url) {
            Ok(scaffold) => scaffold.render(),
            Err(e) => {
                warn!("Project initialization failed: {}", e);
                e.to_report()
            }
        }
    }
}
