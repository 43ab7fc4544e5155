//! Playwright CLI invocation

use std::path::Path;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};

/// Reporter selection: JSON for parsing, HTML for browsing, list for the console
pub const REPORTER_ARG: &str = "--reporter=json,html,list";

/// Optional filters for a test run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    /// Single test file to run
    #[serde(default)]
    pub test_file: Option<String>,

    /// Only run tests whose title matches
    #[serde(default)]
    pub grep: Option<String>,

    /// Named project (browser profile) from the config
    #[serde(default)]
    pub project: Option<String>,

    /// Show the browser window
    #[serde(default)]
    pub headed: bool,
}

/// Configuration for the Playwright launcher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    /// Launcher for the playwright CLI
    pub program: String,

    /// Set `FORCE_COLOR=0` so output stays parse-friendly
    pub no_color: bool,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            program: default_program().to_string(),
            no_color: true,
        }
    }
}

fn default_program() -> &'static str {
    if cfg!(windows) {
        "npx.cmd"
    } else {
        "npx"
    }
}

/// Buffered output of a finished runner process
#[derive(Debug, Clone)]
pub struct RawRun {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

/// Playwright CLI launcher
#[derive(Debug, Clone)]
pub struct PlaywrightCli {
    program: String,
    no_color: bool,
}

impl PlaywrightCli {
    pub fn new(config: PlaywrightConfig) -> Self {
        Self {
            program: config.program,
            no_color: config.no_color,
        }
    }

    /// Argument vector for `playwright test`
    pub fn test_args(options: &RunOptions) -> Vec<String> {
        let mut args = vec!["playwright".to_string(), "test".to_string()];

        if let Some(file) = &options.test_file {
            args.push(file.clone());
        }
        if let Some(grep) = &options.grep {
            args.extend(["--grep".to_string(), grep.clone()]);
        }
        if let Some(project) = &options.project {
            args.extend(["--project".to_string(), project.clone()]);
        }
        if options.headed {
            args.push("--headed".to_string());
        }
        args.push(REPORTER_ARG.to_string());

        args
    }

    /// Run the suite in `work_dir` and buffer both streams to completion
    pub async fn run_tests(&self, work_dir: &Path, options: &RunOptions) -> E2eResult<RawRun> {
        let args = Self::test_args(options);
        debug!("Playwright command: {} {}", self.program, args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .current_dir(work_dir)
            // stdin may be the MCP transport; the runner must never read it
            .stdin(Stdio::null());
        if self.no_color {
            cmd.env("FORCE_COLOR", "0");
        }

        let output = cmd.output().await.map_err(|source| E2eError::RunnerSpawn {
            work_dir: work_dir.to_path_buf(),
            source,
        })?;

        info!(
            "Playwright exited with {:?} ({} bytes stdout, {} bytes stderr)",
            output.status.code(),
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(RawRun {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }

    /// Start `playwright show-report` detached from this process.
    ///
    /// The child gets its own session and null stdio and is never waited
    /// on, so it keeps serving after the host exits. Must be called from
    /// within a tokio runtime. Returns the child's pid.
    pub fn show_report_detached(&self, work_dir: &Path) -> E2eResult<Option<u32>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["playwright", "show-report"])
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);
        detach(&mut cmd);

        let child = cmd.spawn().map_err(|source| E2eError::ReportSpawn {
            work_dir: work_dir.to_path_buf(),
            source,
        })?;

        let pid = child.id();
        info!("Report server started (pid: {:?})", pid);
        Ok(pid)
    }
}

/// Move the child into a new session so it outlives the parent's terminal
/// and process group.
#[cfg(unix)]
fn detach(cmd: &mut Command) {
    // SAFETY: the hook only calls setsid(2), which is async-signal-safe.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid()
                .map(|_| ())
                .map_err(std::io::Error::from)
        });
    }
}

#[cfg(not(unix))]
fn detach(_cmd: &mut Command) {}
