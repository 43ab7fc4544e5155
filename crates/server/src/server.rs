//! MCP server: request dispatch over newline-delimited JSON-RPC

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::prompts::Prompt;
use crate::protocol::{
    Request, Response, RpcError, INVALID_REQUEST, JSONRPC_VERSION, PARSE_ERROR,
};
use crate::tools::ToolHandler;

/// MCP protocol revision this server speaks
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name and version reported in `initialize`
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: "e2e-test-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Server state: identity plus the tool and prompt tables, built once at
/// startup and shared by every request task.
pub struct McpServer {
    info: ServerInfo,
    tools: Vec<Box<dyn ToolHandler>>,
    prompts: Vec<Prompt>,
}

impl McpServer {
    pub fn new(info: ServerInfo) -> Self {
        Self {
            info,
            tools: Vec::new(),
            prompts: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Box<dyn ToolHandler>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_prompts(mut self, prompts: impl IntoIterator<Item = Prompt>) -> Self {
        self.prompts.extend(prompts);
        self
    }

    fn tool(&self, name: &str) -> Option<&dyn ToolHandler> {
        self.tools.iter().find(|t| t.name() == name).map(|t| &**t)
    }

    fn prompt(&self, name: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.name == name)
    }

    /// Serve until `reader` reaches EOF.
    ///
    /// Each request runs in its own task so a long test run does not
    /// block pings or listings; responses are written as they complete.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Response>();

        let writer_task = tokio::spawn(async move {
            while let Some(response) = rx.recv().await {
                let mut line = serde_json::to_vec(&response)?;
                line.push(b'\n');
                writer.write_all(&line).await?;
                writer.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        });

        let mut reader = BufReader::new(reader);
        loop {
            let mut buf = Vec::new();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let line = match String::from_utf8(buf) {
                Ok(line) => line,
                Err(e) => {
                    warn!("Message is not valid UTF-8: {}", e);
                    let _ = tx.send(Response::failure(
                        Value::Null,
                        RpcError::new(PARSE_ERROR, format!("Parse error: {e}")),
                    ));
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    let _ = tx.send(response);
                }
            });
        }

        info!("Input closed, waiting for in-flight requests");
        drop(tx);
        writer_task.await.map_err(std::io::Error::other)??;
        Ok(())
    }

    /// Handle one raw message; `None` for notifications
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(Response::failure(
                    Value::Null,
                    RpcError::new(PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<Request>(value) {
            Ok(request) if !request.jsonrpc.is_empty() && request.jsonrpc != JSONRPC_VERSION => {
                Some(Response::failure(
                    id,
                    RpcError::new(
                        INVALID_REQUEST,
                        format!("Unsupported jsonrpc version: {}", request.jsonrpc),
                    ),
                ))
            }
            Ok(request) => self.handle(request).await,
            Err(e) => Some(Response::failure(
                id,
                RpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")),
            )),
        }
    }

    /// Handle a decoded request; `None` for notifications
    pub async fn handle(&self, request: Request) -> Option<Response> {
        if request.is_notification() {
            debug!("Notification: {}", request.method);
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        debug!("Request {}: {}", id, request.method);
        Some(match self.dispatch(&request.method, request.params).await {
            Ok(result) => Response::success(id, result),
            Err(error) => {
                warn!("Request {} failed: {}", request.method, error);
                Response::failure(id, error)
            }
        })
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {}, "prompts": {} },
                "serverInfo": { "name": self.info.name, "version": self.info.version },
            })),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({
                "tools": self.tools.iter().map(|t| t.listing()).collect::<Vec<_>>(),
            })),
            "tools/call" => {
                let name = required_name(&params)?;
                let tool = self
                    .tool(name)
                    .ok_or_else(|| RpcError::invalid_params(format!("Unknown tool: {name}")))?;
                info!("Calling tool {}", name);
                let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
                let text = tool.call(arguments).await?;
                Ok(json!({ "content": [{ "type": "text", "text": text }] }))
            }
            "prompts/list" => Ok(json!({
                "prompts": self.prompts.iter().map(Prompt::listing).collect::<Vec<_>>(),
            })),
            "prompts/get" => {
                let name = required_name(&params)?;
                self.prompt(name)
                    .map(Prompt::messages)
                    .ok_or_else(|| RpcError::invalid_params(format!("Unknown prompt: {name}")))
            }
            other => Err(RpcError::method_not_found(other)),
        }
    }
}

fn required_name(params: &Value) -> Result<&str, RpcError> {
    params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::invalid_params("Missing params.name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::builtin_prompts;
    use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND};
    use crate::tools::default_tools;
    use e2e_mcp_runner::{RunnerConfig, TestRunner};
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn server(cwd: &std::path::Path) -> McpServer {
        let runner = Arc::new(TestRunner::with_config(RunnerConfig {
            cwd: cwd.to_path_buf(),
            ..Default::default()
        }));
        McpServer::new(ServerInfo::default())
            .with_tools(default_tools(runner))
            .with_prompts(builtin_prompts())
    }

    async fn call(server: &McpServer, message: Value) -> Response {
        server.handle_line(&message.to_string()).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_identity() {
        let tmp = TempDir::new().unwrap();
        let response = call(
            &server(tmp.path()),
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "e2e-test-mcp");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let tmp = TempDir::new().unwrap();
        let message = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert!(server(tmp.path()).handle_line(&message.to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let tmp = TempDir::new().unwrap();
        let response = call(
            &server(tmp.path()),
            json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"}),
        )
        .await;
        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[1]["name"], "e2e_run");
        assert_eq!(response.id, json!("a"));
    }

    #[tokio::test]
    async fn test_tool_call_returns_text_content() {
        let tmp = TempDir::new().unwrap();
        let response = call(
            &server(tmp.path()),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "e2e_run", "arguments": {}}}),
        )
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("❌ Test directory not found."));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let tmp = TempDir::new().unwrap();
        let response = call(
            &server(tmp.path()),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "e2e_nope"}}),
        )
        .await;
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("e2e_nope"));
    }

    #[tokio::test]
    async fn test_prompts_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let server = server(tmp.path());

        let listed = call(&server, json!({"jsonrpc": "2.0", "id": 4, "method": "prompts/list"})).await;
        assert_eq!(listed.result.unwrap()["prompts"][0]["name"], "e2e-context");

        let fetched = call(
            &server,
            json!({"jsonrpc": "2.0", "id": 5, "method": "prompts/get", "params": {"name": "e2e-debug"}}),
        )
        .await;
        assert_eq!(fetched.result.unwrap()["messages"][0]["role"], "assistant");

        let missing = call(
            &server,
            json!({"jsonrpc": "2.0", "id": 6, "method": "prompts/get", "params": {"name": "nope"}}),
        )
        .await;
        assert_eq!(missing.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let tmp = TempDir::new().unwrap();
        let response = call(
            &server(tmp.path()),
            json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"}),
        )
        .await;
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let tmp = TempDir::new().unwrap();
        let response = server(tmp.path()).handle_line("{not json").await.unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version_is_invalid_request() {
        let tmp = TempDir::new().unwrap();
        let response = call(
            &server(tmp.path()),
            json!({"jsonrpc": "1.0", "id": 8, "method": "ping"}),
        )
        .await;
        assert_eq!(response.id, json!(8));
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }

    async fn serve_bytes(server: McpServer, input: &[u8]) -> Vec<Response> {
        let (writer, mut output) = tokio::io::duplex(64 * 1024);
        Arc::new(server).serve(input, writer).await.unwrap();

        let mut raw = String::new();
        output.read_to_string(&mut raw).await.unwrap();
        raw.lines()
            .map(|line| serde_json::from_str::<Response>(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_null_id_is_a_request() {
        let tmp = TempDir::new().unwrap();
        let response = server(tmp.path())
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, Value::Null);
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_serve_survives_non_utf8_line() {
        let tmp = TempDir::new().unwrap();
        let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"x\xff\"}\n".to_vec();
        input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

        let responses = serve_bytes(server(tmp.path()), &input).await;
        assert_eq!(responses.len(), 2);

        let rejected = responses.iter().find(|r| r.id.is_null()).unwrap();
        assert_eq!(rejected.error.as_ref().unwrap().code, PARSE_ERROR);
        let ping = responses.iter().find(|r| r.id == json!(2)).unwrap();
        assert_eq!(ping.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_serve_survives_malformed_json_line() {
        let tmp = TempDir::new().unwrap();
        let input = concat!(
            "this is not json\n",
            "{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"tools/list\"}",
        );

        let responses = serve_bytes(server(tmp.path()), input.as_bytes()).await;
        assert_eq!(responses.len(), 2);

        let rejected = responses.iter().find(|r| r.id.is_null()).unwrap();
        assert_eq!(rejected.error.as_ref().unwrap().code, PARSE_ERROR);
        let listed = responses.iter().find(|r| r.id == json!(3)).unwrap();
        assert_eq!(listed.result.as_ref().unwrap()["tools"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_serve_answers_each_request_line() {
        let tmp = TempDir::new().unwrap();
        let server = Arc::new(server(tmp.path()));

        let input = concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n",
            "{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
            "\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n",
        );
        let (writer, mut output) = tokio::io::duplex(64 * 1024);
        server.serve(input.as_bytes(), writer).await.unwrap();

        let mut raw = String::new();
        output.read_to_string(&mut raw).await.unwrap();
        let mut ids: Vec<i64> = raw
            .lines()
            .map(|line| serde_json::from_str::<Response>(line).unwrap())
            .map(|response| response.id.as_i64().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }
}
