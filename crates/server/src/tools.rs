//! MCP tool handlers
//!
//! Each handler adapts one [`TestRunner`] operation. Handlers only fail on
//! malformed arguments; operation failures come back as explanatory text.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use e2e_mcp_runner::{RunOptions, TestRunner};

use crate::protocol::RpcError;

/// A named tool callable through `tools/call`
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the `arguments` object
    fn input_schema(&self) -> Value;

    /// Run the tool, producing the text block shown to the caller
    async fn call(&self, arguments: Value) -> Result<String, RpcError>;

    /// `tools/list` entry
    fn listing(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.input_schema(),
        })
    }
}

/// Deserialize tool arguments; a missing object counts as empty
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, RpcError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments)
        .map_err(|e| RpcError::invalid_params(format!("Invalid arguments for {tool}: {e}")))
}

/// The standard tool set over one shared runner
pub fn default_tools(runner: Arc<TestRunner>) -> Vec<Box<dyn ToolHandler>> {
    vec![
        Box::new(InitTool { runner: Arc::clone(&runner) }),
        Box::new(RunTool { runner: Arc::clone(&runner) }),
        Box::new(ReportTool { runner }),
    ]
}

/// `e2e_init`: scaffold a Playwright project
pub struct InitTool {
    runner: Arc<TestRunner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitArgs {
    project_dir: PathBuf,
    #[serde(default)]
    base_url: Option<String>,
}

#[async_trait]
impl ToolHandler for InitTool {
    fn name(&self) -> &'static str {
        "e2e_init"
    }

    fn description(&self) -> &'static str {
        "Initialize an E2E test project: Playwright config and directory layout"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "projectDir": { "type": "string", "description": "Project root directory" },
                "baseUrl": {
                    "type": "string",
                    "description": "URL under test, defaults to http://localhost:3000"
                }
            },
            "required": ["projectDir"]
        })
    }

    async fn call(&self, arguments: Value) -> Result<String, RpcError> {
        let args: InitArgs = parse_args(self.name(), arguments)?;
        info!("e2e_init for {}", args.project_dir.display());
        Ok(self
            .runner
            .init_project_text(&args.project_dir, args.base_url.as_deref()))
    }
}

/// `e2e_run`: run the suite and summarize it
pub struct RunTool {
    runner: Arc<TestRunner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunArgs {
    #[serde(default)]
    test_dir: Option<PathBuf>,
    #[serde(flatten)]
    options: RunOptions,
}

#[async_trait]
impl ToolHandler for RunTool {
    fn name(&self) -> &'static str {
        "e2e_run"
    }

    fn description(&self) -> &'static str {
        "Run the E2E tests and return a summary of the results"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "testDir": { "type": "string", "description": "Test directory path" },
                "testFile": { "type": "string", "description": "Run only this test file" },
                "grep": { "type": "string", "description": "Filter tests by title" },
                "project": { "type": "string", "description": "Browser project to run" },
                "headed": { "type": "boolean", "description": "Show the browser window" }
            }
        })
    }

    async fn call(&self, arguments: Value) -> Result<String, RpcError> {
        let args: RunArgs = parse_args(self.name(), arguments)?;
        Ok(self
            .runner
            .run_text(args.test_dir.as_deref(), &args.options)
            .await)
    }
}

/// `e2e_report`: open the HTML report
pub struct ReportTool {
    runner: Arc<TestRunner>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportArgs {
    #[serde(default)]
    test_dir: Option<PathBuf>,
}

#[async_trait]
impl ToolHandler for ReportTool {
    fn name(&self) -> &'static str {
        "e2e_report"
    }

    fn description(&self) -> &'static str {
        "Open the Playwright HTML test report"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "testDir": { "type": "string", "description": "Test directory path" }
            }
        })
    }

    async fn call(&self, arguments: Value) -> Result<String, RpcError> {
        let args: ReportArgs = parse_args(self.name(), arguments)?;
        Ok(self.runner.open_report_text(args.test_dir.as_deref()))
    }
}
