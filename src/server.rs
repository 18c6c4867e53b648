// Congress MCP - Model Context Protocol server for the Congress.gov API
//
// Copyright (c) 2025 the congress-mcp contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! MCP server implementation.
//!
//! JSON-RPC 2.0 over stdio: one request per line on stdin, one response per
//! line on stdout. Each request is handled on its own task so a slow
//! upstream call never blocks unrelated requests; responses are funneled
//! through a channel to a single writer task and clients correlate them by
//! id. All logging goes to stderr, keeping stdout protocol-clean.

use crate::error::CongressResult;
use crate::protocol::*;
use crate::resources::{get_resources, read_resource};
use crate::tools::{execute_tool, get_tools, ToolContext};
use crate::{SERVER_NAME, VERSION};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Buffered responses awaiting the stdout writer.
const RESPONSE_CHANNEL_CAPACITY: usize = 64;

/// Congress MCP server.
///
/// Implements the Model Context Protocol (MCP) over JSON-RPC 2.0 for AI/LLM
/// access to U.S. legislative data. Provides:
///
/// - Tool execution (committees, hearings, bills, members, search, status)
/// - Resource reads (pre-baked `congress://` listings)
/// - Protocol lifecycle (initialize, shutdown)
///
/// # Thread Safety
///
/// Handlers borrow shared state only: the upstream client, cache and rate
/// limiter are `Arc`-shared and internally synchronized, and the
/// initialization flag is atomic. The server itself is wrapped in an `Arc`
/// so each request task can hold a reference across `.await` points.
pub struct McpServer {
    /// Shared tool execution state (client, search engine, cache, limiter,
    /// health checker).
    ctx: ToolContext,

    /// Server name reported in the protocol handshake.
    name: String,

    /// Server version reported in the protocol handshake.
    version: String,

    /// Set after a successful `initialize` handshake, cleared on `shutdown`.
    initialized: AtomicBool,
}

impl McpServer {
    /// Create a new MCP server around the shared tool context.
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            ctx,
            name: SERVER_NAME.to_string(),
            version: VERSION.to_string(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Whether the `initialize` handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Run the server on stdio until stdin closes.
    ///
    /// Reads JSON-RPC requests line-by-line, dispatches each on its own task
    /// and writes responses back through a single writer so concurrent
    /// completions never interleave bytes on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read or a response cannot be
    /// serialized. Write failures terminate the writer task and are logged.
    pub async fn run_stdio(self: Arc<Self>) -> CongressResult<()> {
        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);

        let (tx, mut rx) = mpsc::channel::<String>(RESPONSE_CHANNEL_CAPACITY);
        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(encoded) = rx.recv().await {
                debug!("Sending: {}", encoded);
                if let Err(e) = stdout.write_all(encoded.as_bytes()).await {
                    error!("Write error: {}", e);
                    break;
                }
                if let Err(e) = stdout.write_all(b"\n").await {
                    error!("Write error: {}", e);
                    break;
                }
                if let Err(e) = stdout.flush().await {
                    error!("Write error: {}", e);
                    break;
                }
            }
        });

        info!("Congress MCP server starting on stdio");

        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    debug!("Received: {}", line);

                    match serde_json::from_str::<JsonRpcRequest>(line) {
                        Ok(request) => {
                            let server = Arc::clone(&self);
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                let response = server.handle_request(request).await;
                                match serde_json::to_string(&response) {
                                    Ok(encoded) => {
                                        if tx.send(encoded).await.is_err() {
                                            error!("Response channel closed");
                                        }
                                    }
                                    Err(e) => error!("Response serialization failed: {}", e),
                                }
                            });
                        }
                        Err(e) => {
                            let response = JsonRpcResponse::error(
                                None,
                                -32700,
                                format!("Parse error: {}", e),
                                None,
                            );
                            let encoded = serde_json::to_string(&response)?;
                            if tx.send(encoded).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Read error: {}", e);
                    break;
                }
            }
        }

        // In-flight request tasks hold their own channel clones, so the
        // writer drains them before exiting.
        drop(tx);
        let _ = writer.await;

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    ///
    /// Routes the request to the appropriate handler based on the method
    /// name. Unknown methods return a "Method not found" error (-32601).
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => self.handle_initialized(id),
            "shutdown" => self.handle_shutdown(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            "resources/list" => self.handle_resources_list(id),
            "resources/read" => self.handle_resources_read(id, request.params).await,
            "ping" => JsonRpcResponse::success(id, json!({})),
            method => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::error(id, -32601, format!("Method not found: {}", method), None)
            }
        }
    }

    /// Handle the `initialize` method for the MCP handshake.
    ///
    /// Performs protocol version negotiation and advertises server
    /// capabilities. This must be the first method called in the protocol
    /// lifecycle.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let _params: InitializeParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        -32602,
                        format!("Invalid params: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, -32602, "Missing params".to_string(), None);
            }
        };

        self.initialized.store(true, Ordering::SeqCst);
        info!("Server initialized");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: self.version.clone(),
            },
        };

        JsonRpcResponse::success(
            id,
            serde_json::to_value(result).expect("InitializeResult serialization cannot fail"),
        )
    }

    /// Handle the `initialized` notification sent after the handshake.
    fn handle_initialized(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("Client sent initialized notification");
        JsonRpcResponse::success(id, json!({}))
    }

    /// Handle the `shutdown` method for graceful termination.
    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        info!("Server shutting down");
        self.initialized.store(false, Ordering::SeqCst);
        JsonRpcResponse::success(id, json!({}))
    }

    /// Handle the `tools/list` method.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResult { tools: get_tools() };
        JsonRpcResponse::success(
            id,
            serde_json::to_value(result).expect("ListToolsResult serialization cannot fail"),
        )
    }

    /// Handle the `tools/call` method.
    ///
    /// Executes a tool by name with the provided arguments. Tool execution
    /// errors are returned as successful responses with `is_error: true` to
    /// distinguish them from protocol-level errors; only malformed or
    /// missing parameters produce a JSON-RPC error (-32602).
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        -32602,
                        format!("Invalid params: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, -32602, "Missing params".to_string(), None);
            }
        };

        let CallToolParams { name, arguments } = params;
        match execute_tool(&name, arguments, &self.ctx).await {
            Ok(result) => JsonRpcResponse::success(
                id,
                serde_json::to_value(result).expect("CallToolResult serialization cannot fail"),
            ),
            Err(e) => {
                let result = CallToolResult::error_text(format!("Error: {}", e));
                JsonRpcResponse::success(
                    id,
                    serde_json::to_value(result).expect("CallToolResult serialization cannot fail"),
                )
            }
        }
    }

    /// Handle the `resources/list` method.
    fn handle_resources_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListResourcesResult {
            resources: get_resources(),
        };
        JsonRpcResponse::success(
            id,
            serde_json::to_value(result).expect("ListResourcesResult serialization cannot fail"),
        )
    }

    /// Handle the `resources/read` method.
    ///
    /// Renders the resource identified by a `congress://` URI as plain text.
    /// Unknown URIs and upstream failures produce a JSON-RPC error response
    /// (-32002) carrying the original message.
    async fn handle_resources_read(
        &self,
        id: Option<Value>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: ReadResourceParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        -32602,
                        format!("Invalid params: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(id, -32602, "Missing params".to_string(), None);
            }
        };

        match read_resource(&params.uri, &self.ctx).await {
            Ok(text) => {
                let result = ReadResourceResult {
                    contents: vec![ResourceContent {
                        uri: params.uri,
                        mime_type: Some("text/plain".to_string()),
                        text: Some(text),
                    }],
                };
                JsonRpcResponse::success(
                    id,
                    serde_json::to_value(result)
                        .expect("ReadResourceResult serialization cannot fail"),
                )
            }
            Err(e) => {
                JsonRpcResponse::error(id, -32002, format!("Failed to read resource: {}", e), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context_with_stub, StubApi};

    fn server() -> McpServer {
        McpServer::new(context_with_stub(StubApi::default()))
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn initialize_params() -> Value {
        json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": {"name": "test-client", "version": "0.0.0"}
        })
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let server = server();
        let response = server
            .handle_request(request("initialize", Some(initialize_params())))
            .await;

        let result = response.result.expect("handshake should succeed");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_initialize_requires_params() {
        let server = server();
        let response = server.handle_request(request("initialize", None)).await;
        let error = response.error.expect("missing params must fail");
        assert_eq!(error.code, -32602);
        assert_eq!(error.message, "Missing params");
        assert!(!server.is_initialized());
    }

    #[tokio::test]
    async fn test_shutdown_resets_lifecycle() {
        let server = server();
        server
            .handle_request(request("initialize", Some(initialize_params())))
            .await;
        assert!(server.is_initialized());

        let response = server.handle_request(request("shutdown", None)).await;
        assert!(response.result.is_some());
        assert!(!server.is_initialized());
    }

    #[tokio::test]
    async fn test_ping_returns_empty_object() {
        let response = server().handle_request(request("ping", None)).await;
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_unknown_method_not_found() {
        let response = server().handle_request(request("tools/steal", None)).await;
        let error = response.error.expect("unknown method must fail");
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found: tools/steal");
    }

    #[tokio::test]
    async fn test_tools_list_catalog() {
        let response = server().handle_request(request("tools/list", None)).await;
        let result = response.result.expect("list should succeed");
        let tools = result["tools"].as_array().expect("tools array");
        assert_eq!(tools.len(), 15);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool_reports_in_band() {
        let response = server()
            .handle_request(request(
                "tools/call",
                Some(json!({"name": "get_weather", "arguments": {}})),
            ))
            .await;

        // Tool failures ride inside a successful response.
        let result = response.result.expect("tool errors are in-band");
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().expect("text block");
        assert!(text.starts_with("Error: "), "{}", text);
    }

    #[tokio::test]
    async fn test_tools_call_executes_tool() {
        let response = server()
            .handle_request(request(
                "tools/call",
                Some(json!({"name": "get_congress_info"})),
            ))
            .await;

        let result = response.result.expect("call should succeed");
        assert!(result.get("isError").is_none());
        let text = result["content"][0]["text"].as_str().expect("text block");
        assert!(text.contains("Congress Number: 118"));
    }

    #[tokio::test]
    async fn test_resources_list_catalog() {
        let response = server()
            .handle_request(request("resources/list", None))
            .await;
        let result = response.result.expect("list should succeed");
        let resources = result["resources"].as_array().expect("resources array");
        assert_eq!(resources.len(), 12);
    }

    #[tokio::test]
    async fn test_resources_read_unknown_uri() {
        let response = server()
            .handle_request(request(
                "resources/read",
                Some(json!({"uri": "congress://weather/today"})),
            ))
            .await;
        let error = response.error.expect("unknown resource must fail");
        assert_eq!(error.code, -32002);
        assert!(error.message.contains("Unknown resource type: weather"));
    }

    #[tokio::test]
    async fn test_resources_read_renders_text() {
        let response = server()
            .handle_request(request(
                "resources/read",
                Some(json!({"uri": "congress://status/congress"})),
            ))
            .await;
        let result = response.result.expect("read should succeed");
        let content = &result["contents"][0];
        assert_eq!(content["uri"], "congress://status/congress");
        assert_eq!(content["mimeType"], "text/plain");
        let text = content["text"].as_str().expect("text");
        assert!(text.contains("Congress Number: 118"));
    }
}
