//! MCP (Model Context Protocol) Server
//!
//! This module implements an MCP server using manual JSON-RPC 2.0 over stdio.
//! The protocol surface is small enough that a direct implementation beats
//! pulling in an MCP-specific crate.
//!
//! # Architecture
//!
//! - **Transport**: JSON-RPC 2.0 over stdio (line-based)
//! - **Stateless**: each tool invocation is completely independent; no
//!   transfer state survives between a preview and an execution
//! - **Two-step approval**: `preview_transfer_command` never runs anything;
//!   `execute_transfer` requires `confirmation: true` and the token vector
//!   from a prior preview
//!
//! # MCP Tools
//!
//! - `preview_transfer_command` - Validate a request and show the command
//! - `execute_transfer` - Run a previewed command (requires confirmation)
//! - `validate_connection` - Check one connection descriptor
//! - `list_supported_combinations` - Source/target compatibility listing
//! - `suggest_parallelism_method` - Advise on a `--method` value
//! - `get_version` - Binary path, detected version, capability entry
//!
//! # Usage
//!
//! Start the MCP server with: `conveyor mcp`
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "conveyor": {
//!       "command": "conveyor",
//!       "args": ["mcp"]
//!     }
//!   }
//! }
//! ```

use anyhow::{anyhow, Result};
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};

use crate::config::Settings;
use crate::model::{RawConnection, RawTransferRequest};
use crate::ops::{self, SuggestRequest};
use crate::validate::Side;

// ============================================================================
// JSON-RPC 2.0 Structures
// ============================================================================

/// JSON-RPC 2.0 Request
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

// ============================================================================
// MCP Tool Result Structures
// ============================================================================

/// Text content block for MCP tool results
#[derive(Debug, Serialize)]
struct TextContent {
    #[serde(rename = "type")]
    content_type: String,
    text: String,
}

impl TextContent {
    fn new(text: String) -> Self {
        Self { content_type: "text".to_string(), text }
    }
}

/// MCP tool call result
#[derive(Debug, Serialize)]
struct CallToolResult {
    content: Vec<TextContent>,
    #[serde(rename = "isError")]
    is_error: bool,
}

impl CallToolResult {
    /// Create a successful tool result with JSON data
    fn success(data: impl Serialize) -> Result<Value> {
        let json_text = serde_json::to_string_pretty(&data)?;
        let result = Self { content: vec![TextContent::new(json_text)], is_error: false };
        Ok(serde_json::to_value(result)?)
    }
}

// ============================================================================
// MCP Server
// ============================================================================

/// Start the MCP server
///
/// Runs the main server loop, reading JSON-RPC requests from stdin and
/// writing JSON-RPC responses to stdout, one line each way per message.
///
/// # Errors
///
/// Returns an error if stdio communication fails.
#[allow(clippy::future_not_send)]
pub async fn serve() -> Result<()> {
    let stdin = io::stdin();
    let reader = stdin.lock();
    let mut stdout = io::stdout();

    for line in reader.lines() {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let error_response = JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id: None,
                    result: None,
                    error: Some(JsonRpcError {
                        code: -32700, // Parse error
                        message: format!("Parse error: {e}"),
                        data: None,
                    }),
                };
                let response_json = serde_json::to_string(&error_response)?;
                writeln!(stdout, "{response_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let response = handle_request(request).await;

        let response_json = serde_json::to_string(&response)?;
        writeln!(stdout, "{response_json}")?;
        stdout.flush()?;
    }

    Ok(())
}

/// Route a JSON-RPC request to the matching handler
async fn handle_request(request: JsonRpcRequest) -> JsonRpcResponse {
    let result = match request.method.as_str() {
        "initialize" => handle_initialize(request.params),
        "tools/list" => handle_list_tools(),
        "tools/call" => handle_call_tool(request.params).await,
        _ => Err(anyhow!("Unknown method: {}", request.method)),
    };

    match result {
        Ok(value) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id,
            result: Some(value),
            error: None,
        },
        Err(e) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id,
            result: None,
            error: Some(JsonRpcError {
                code: -32603, // Internal error
                message: e.to_string(),
                data: None,
            }),
        },
    }
}

// ============================================================================
// MCP Protocol Handlers
// ============================================================================

/// Handle MCP initialize request
fn handle_initialize(_params: Option<Value>) -> Result<Value> {
    Ok(serde_json::json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": "conveyor",
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

/// Handle tools/list request
///
/// Returns the available tools with their input schemas. Request schemas are
/// generated from the same types the handlers deserialize into, so the
/// advertised schema can never drift from what a tool accepts.
fn handle_list_tools() -> Result<Value> {
    let transfer_schema = serde_json::to_value(schema_for!(RawTransferRequest))?;
    let connection_schema = serde_json::to_value(schema_for!(RawConnection))?;
    let suggest_schema = serde_json::to_value(schema_for!(SuggestRequest))?;

    Ok(serde_json::json!({
        "tools": [
            {
                "name": "preview_transfer_command",
                "description": "Validate a transfer request and return the exact FastTransfer command it would run, WITHOUT executing anything. ALWAYS call this before execute_transfer and show the user the 'display' field. Returns: 'explanation' (numbered summary of what the transfer does), 'tokens' (the argument vector to pass to execute_transfer verbatim), 'redacted_tokens'/'display' (safe to show; passwords and connection strings are masked), and the capability snapshot the request was validated against. On validation failure every violated rule is reported at once with a stable code and field path, so fix all of them before retrying. Credentials appear only in 'tokens' - never print that field.",
                "inputSchema": transfer_schema
            },
            {
                "name": "execute_transfer",
                "description": "Run FastTransfer with a token vector obtained from preview_transfer_command. REQUIRES confirmation=true - call preview first, show the user the redacted command, and only set confirmation after the user approves. Pass the preview's 'tokens' array unchanged; do not edit, reorder, or construct tokens yourself. Returns exit_code, stdout, stderr, and duration_ms. A non-zero exit code is reported in the result, not as a protocol error. The run is subject to the configured timeout (FASTTRANSFER_TIMEOUT, default 1800s) and is killed when exceeded.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "tokens": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "Argument vector from preview_transfer_command's 'tokens' field, passed unchanged."
                        },
                        "confirmation": {
                            "type": "boolean",
                            "description": "Must be true. Set only after the user has seen the redacted command and approved the execution."
                        }
                    },
                    "required": ["tokens", "confirmation"]
                }
            },
            {
                "name": "validate_connection",
                "description": "Check a single connection descriptor without building a full transfer request. Validates the connection-description strategy (host/credentials vs connect_string vs dsn are mutually exclusive), required fields for the chosen side, and whether the connection type is supported by the installed FastTransfer version. 'side' selects which rule set applies: sources may carry table/query/file_input, targets must name a table. No database connection is opened; this is structural validation only.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "side": {
                            "type": "string",
                            "enum": ["source", "target"],
                            "description": "Which end of the transfer this descriptor describes."
                        },
                        "connection": connection_schema
                    },
                    "required": ["side", "connection"]
                }
            },
            {
                "name": "list_supported_combinations",
                "description": "List every source connection type with the target types it can transfer to, under the installed FastTransfer version. Use this to answer 'can I move data from X to Y' before constructing a request. Generic bridge sources (odbc, oledb) reach every supported target; engine-specific sources are limited by the compatibility matrix.",
                "inputSchema": {"type": "object", "properties": {}}
            },
            {
                "name": "suggest_parallelism_method",
                "description": "Recommend a --method value from coarse table statistics. Deterministic, first match wins: tables under 100000 rows get 'None' (parallelism overhead dominates); PostgreSQL/Oracle/Netezza sources get their engine-native split (Ctid/Rowid/NZDataSlice); a numeric key gets 'RangeId'; a date or string key gets 'Ntile'; otherwise 'DataDriven', which additionally needs a data_driven_query. The rationale names the condition that fired. Advisory only - the request you build still chooses its own method.",
                "inputSchema": suggest_schema
            },
            {
                "name": "get_version",
                "description": "Report the configured FastTransfer binary path, the version detected by probing it, and the capability entry (supported sources, targets, methods, feature flags) governing validation. 'used_fallback' true means the binary could not be probed and the conservative default capability set is in effect; 'downgraded' true means the detected version predates the oldest known capability entry.",
                "inputSchema": {"type": "object", "properties": {}}
            }
        ]
    }))
}

/// Handle tools/call request
async fn handle_call_tool(params: Option<Value>) -> Result<Value> {
    let params = params.ok_or_else(|| anyhow!("Missing params"))?;
    let name = params["name"].as_str().ok_or_else(|| anyhow!("Missing tool name"))?;
    let arguments = &params["arguments"];

    let settings = Settings::from_env().map_err(|e| anyhow!(e.message()))?;

    match name {
        "preview_transfer_command" => tool_preview(arguments, &settings).await,
        "execute_transfer" => tool_execute(arguments, &settings).await,
        "validate_connection" => tool_validate_connection(arguments, &settings).await,
        "list_supported_combinations" => tool_combinations(&settings).await,
        "suggest_parallelism_method" => tool_suggest(arguments, &settings).await,
        "get_version" => tool_version(&settings).await,
        _ => Err(anyhow!("Unknown tool: {name}")),
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

/// MCP Tool: `preview_transfer_command`
async fn tool_preview(args: &Value, settings: &Settings) -> Result<Value> {
    let raw: RawTransferRequest = serde_json::from_value(args.clone())
        .map_err(|e| anyhow!("Invalid transfer request: {e}"))?;

    match ops::preview(&raw, settings).await {
        Ok((preview, warnings)) => CallToolResult::success(serde_json::json!({
            "ok": true,
            "explanation": preview.explanation,
            "tokens": preview.tokens,
            "redacted_tokens": preview.redacted_tokens,
            "display": preview.display,
            "capability": preview.capability,
            "warnings": warnings,
        })),
        Err(e) => CallToolResult::success(serde_json::json!({
            "ok": false,
            "error": {
                "code": e.error_code(),
                "message": e.message(),
                "details": e.validation_details(),
            }
        })),
    }
}

/// MCP Tool: `execute_transfer`
async fn tool_execute(args: &Value, settings: &Settings) -> Result<Value> {
    let confirmed = args
        .get("confirmation")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !confirmed {
        return Err(anyhow!(
            "Execution requires confirmation=true. Preview the command, show the user the \
             redacted form, and set confirmation once approved."
        ));
    }

    let tokens: Vec<String> = args
        .get("tokens")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| anyhow!("Invalid tokens: {e}"))?
        .ok_or_else(|| anyhow!("Missing required field: tokens"))?;
    if tokens.is_empty() {
        return Err(anyhow!("tokens must come from preview_transfer_command and cannot be empty"));
    }

    match ops::run(&tokens, settings).await {
        Ok(report) => CallToolResult::success(serde_json::json!({
            "ok": report.succeeded(),
            "exit_code": report.exit_code,
            "stdout": report.stdout,
            "stderr": report.stderr,
            "duration_ms": report.duration_ms,
        })),
        Err(e) => CallToolResult::success(serde_json::json!({
            "ok": false,
            "error": {
                "code": e.error_code(),
                "message": e.message(),
            }
        })),
    }
}

/// MCP Tool: `validate_connection`
async fn tool_validate_connection(args: &Value, settings: &Settings) -> Result<Value> {
    let side_str =
        args.get("side").and_then(Value::as_str).ok_or_else(|| anyhow!("Missing required field: side"))?;
    let side = Side::parse(side_str)
        .ok_or_else(|| anyhow!("Invalid side '{side_str}'. Must be 'source' or 'target'"))?;

    let connection: RawConnection = args
        .get("connection")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| anyhow!("Invalid connection descriptor: {e}"))?
        .ok_or_else(|| anyhow!("Missing required field: connection"))?;

    match ops::check_connection(&connection, side, settings).await {
        Ok(value) => CallToolResult::success(value),
        Err(e) => CallToolResult::success(serde_json::json!({
            "valid": false,
            "error": {
                "code": e.error_code(),
                "message": e.message(),
                "details": e.validation_details(),
            }
        })),
    }
}

/// MCP Tool: `list_supported_combinations`
async fn tool_combinations(settings: &Settings) -> Result<Value> {
    let caps = ops::resolve_capabilities(settings).await;
    CallToolResult::success(ops::supported_combinations(&caps))
}

/// MCP Tool: `suggest_parallelism_method`
async fn tool_suggest(args: &Value, settings: &Settings) -> Result<Value> {
    let params: SuggestRequest = serde_json::from_value(args.clone())
        .map_err(|e| anyhow!("Invalid suggestion request: {e}"))?;

    let suggestion = ops::suggest_method(&params, settings).await.map_err(|e| anyhow!(e.message()))?;
    CallToolResult::success(serde_json::json!({
        "method": suggestion.method,
        "rationale": suggestion.rationale,
    }))
}

/// MCP Tool: `get_version`
async fn tool_version(settings: &Settings) -> Result<Value> {
    CallToolResult::success(ops::version_info(settings).await)
}
