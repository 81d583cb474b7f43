//! MCP server over stdio.
//!
//! JSON-RPC 2.0, one message per line. Only the tool capability is offered.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{dispatcher::ToolDispatcher, totp::Clock};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "totp";

const JSONRPC_VERSION: &str = "2.0";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;

// =============================================================================
// JSON-RPC Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    jsonrpc: String,
    // Absent for notifications
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// =============================================================================
// MCP Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ToolResult {
    content: Vec<ToolContent>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

// =============================================================================
// Server
// =============================================================================

pub struct McpServer<C> {
    dispatcher: ToolDispatcher<C>,
}

impl<C: Clock> McpServer<C> {
    pub fn new(dispatcher: ToolDispatcher<C>) -> Self {
        Self { dispatcher }
    }

    /// Serves requests until the reader is exhausted. Each request is
    /// answered before the next line is read.
    pub fn run(&self, reader: impl BufRead, mut writer: impl Write) -> io::Result<()> {
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("stopped reading requests: {e}");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(&request),
                Err(e) => {
                    warn!("malformed request: {e}");
                    Some(JsonRpcResponse::error(Value::Null, PARSE_ERROR, e.to_string()))
                }
            };

            if let Some(response) = response {
                let encoded = serde_json::to_string(&response)?;
                writeln!(writer, "{encoded}")?;
                writer.flush()?;
            }
        }

        Ok(())
    }

    /// Answers one request. Notifications, i.e. messages without an id,
    /// get no response.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "request");

        let id = request.id.clone()?;

        if request.jsonrpc != JSONRPC_VERSION {
            warn!(version = %request.jsonrpc, "unsupported JSON-RPC version");
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Invalid Request: expected jsonrpc \"{JSONRPC_VERSION}\""),
            ));
        }

        match request.method.as_str() {
            "initialize" => Some(JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "capabilities": {
                        "tools": {}
                    }
                }),
            )),
            "ping" => Some(JsonRpcResponse::success(id, json!({}))),
            "tools/list" => Some(JsonRpcResponse::success(
                id,
                json!({ "tools": self.dispatcher.tool_definitions() }),
            )),
            "tools/call" => {
                let name = request
                    .params
                    .get("name")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                let args = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or(json!({}));

                let result = ToolResult {
                    content: vec![ToolContent::Text {
                        text: self.dispatcher.call(name, &args),
                    }],
                };
                Some(JsonRpcResponse::success(id, json!(result)))
            }
            _ => Some(JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        }
    }
}
