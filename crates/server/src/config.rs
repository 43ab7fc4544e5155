//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use e2e_mcp_runner::{PlaywrightConfig, RunnerConfig, DEFAULT_BASE_URL, DEFAULT_REPORT_PORT};

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    /// Playwright invocation
    pub runner: RunnerSection,

    /// Project scaffolding
    pub scaffold: ScaffoldSection,

    /// HTML report server
    pub report: ReportSection,
}

/// Playwright invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSection {
    /// Launcher for the playwright CLI
    pub program: String,

    /// Extra directories the locator searches after an explicit one
    pub search_paths: Vec<PathBuf>,

    /// Disable colored runner output
    pub no_color: bool,
}

impl Default for RunnerSection {
    fn default() -> Self {
        let playwright = PlaywrightConfig::default();
        Self {
            program: playwright.program,
            search_paths: Vec::new(),
            no_color: playwright.no_color,
        }
    }
}

/// Scaffolding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldSection {
    /// Base URL written into new configs when the caller gives none
    pub base_url: String,
}

impl Default for ScaffoldSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Report server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Port `playwright show-report` is expected to listen on
    pub port: u16,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            port: DEFAULT_REPORT_PORT,
        }
    }
}

impl McpConfig {
    /// Load configuration from file, or defaults when it does not exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Runner configuration rooted at `cwd`
    pub fn runner_config(&self, cwd: PathBuf) -> RunnerConfig {
        RunnerConfig {
            cwd,
            search_paths: self.runner.search_paths.clone(),
            playwright: PlaywrightConfig {
                program: self.runner.program.clone(),
                no_color: self.runner.no_color,
            },
            base_url: self.scaffold.base_url.clone(),
            report_port: self.report.port,
        }
    }
}
