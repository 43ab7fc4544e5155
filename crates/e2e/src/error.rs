//! Error types for runner operations

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Test directory not found (cwd: {})", .cwd.display())]
    TestDirNotFound { cwd: PathBuf },

    #[error("Dependencies not installed in {}", .dir.display())]
    DependenciesMissing { dir: PathBuf },

    #[error("Failed to start Playwright: {source}")]
    RunnerSpawn {
        work_dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to start report server: {source}")]
    ReportSpawn {
        work_dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Report directory not found: {}", .expected.display())]
    ReportMissing { expected: PathBuf, work_dir: PathBuf },

    #[error("Project directory does not exist: {}", .0.display())]
    ProjectDirMissing(PathBuf),

    #[error("Failed to write {}: {source}", .path.display())]
    Scaffold {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

impl E2eError {
    /// User-facing explanation with the remedial action, for display in
    /// place of an operation's normal result.
    pub fn to_report(&self) -> String {
        match self {
            E2eError::TestDirNotFound { cwd } => format!(
                "❌ Test directory not found.

Make sure that:
1. An e2e, tests or test directory exists
2. It contains a playwright.config.ts (or .js / .mjs) file
3. Or pass the full path with the testDir argument

Current working directory: {}",
                cwd.display()
            ),
            E2eError::DependenciesMissing { dir } => format!(
                "❌ Dependencies are not installed in the test directory.

Run first:
```bash
cd {}
npm install
npx playwright install chromium
```",
                dir.display()
            ),
            E2eError::RunnerSpawn { work_dir, source } => format!(
                "❌ Test execution failed: {}\n\nTest directory: {}",
                source,
                work_dir.display()
            ),
            E2eError::ReportSpawn { work_dir, source } => format!(
                "❌ Failed to open report: {}

You can run it manually:
```bash
cd {}
npx playwright show-report
```",
                source,
                work_dir.display()
            ),
            E2eError::ReportMissing { expected, work_dir } => format!(
                "❌ Test report not found.

Report directory does not exist: `{}`

Run the tests first to generate it:
```bash
cd {}
npx playwright test
```

Or use the `e2e_run` tool to run the tests.",
                expected.display(),
                work_dir.display()
            ),
            E2eError::ProjectDirMissing(dir) => format!(
                "❌ Project directory does not exist: {}\n\nCreate it and try again.",
                dir.display()
            ),
            E2eError::Scaffold { .. } => format!("❌ Initialization failed: {self}"),
            E2eError::Io(_) | E2eError::Json(_) => format!("❌ Operation failed: {self}"),
        }
    }
}
