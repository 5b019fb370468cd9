//! Model Context Protocol host.
//!
//! A small JSON-RPC 2.0 dispatcher exposing the tools and the station
//! resource, plus stdio and HTTP transports that feed it.

mod catalog;
mod http;
mod stdio;

pub use catalog::{GET_DEPARTURES, SEARCH_STATIONS, SEARCH_TRIPS, resource_templates, tools};
pub use http::{create_router, serve_http};
pub use stdio::{run_stdio, serve_lines};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::ns::NsError;
use crate::tools::{
    self, AppState, DeparturesOutput, STATION_URI_PREFIX, StationsOutput, TripsOutput,
};

/// Protocol revision this server implements.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const SERVER_NAME: &str = "ns-bridge";

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// Absent for notifications; an explicit `null` is still a request
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

/// A JSON-RPC 2.0 response.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_PARAMS, message)
    }
}

/// Result of `tools/call`.
#[derive(Debug, Serialize)]
struct CallToolResult {
    content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    is_error: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Content {
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct CallToolParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Handle one raw JSON-RPC message.
///
/// Returns `None` for notifications, which get no reply.
pub async fn handle_request(state: &AppState, raw: &str) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(raw) {
        Ok(req) => req,
        Err(e) => {
            return Some(JsonRpcResponse {
                jsonrpc: "2.0",
                id: None,
                result: None,
                error: Some(JsonRpcError::new(
                    JsonRpcError::PARSE_ERROR,
                    format!("Parse error: {e}"),
                )),
            });
        }
    };

    let Some(id) = request.id else {
        debug!(method = %request.method, "notification received");
        return None;
    };

    let result = dispatch(state, &request.method, request.params).await;

    Some(match result {
        Ok(value) => JsonRpcResponse {
            jsonrpc: "2.0",
            id: Some(id),
            result: Some(value),
            error: None,
        },
        Err(error) => JsonRpcResponse {
            jsonrpc: "2.0",
            id: Some(id),
            result: None,
            error: Some(error),
        },
    })
}

async fn dispatch(
    state: &AppState,
    method: &str,
    params: Option<Value>,
) -> Result<Value, JsonRpcError> {
    debug!(method, "handling request");

    match method {
        "initialize" => Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {},
                "resources": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": catalog::tools() })),
        "tools/call" => call_tool(state, params).await,
        "resources/list" => Ok(json!({ "resources": [] })),
        "resources/templates/list" => {
            Ok(json!({ "resourceTemplates": catalog::resource_templates() }))
        }
        "resources/read" => read_resource(state, params).await,
        method => Err(JsonRpcError::new(
            JsonRpcError::METHOD_NOT_FOUND,
            format!("Method not found: {method}"),
        )),
    }
}

async fn call_tool(state: &AppState, params: Option<Value>) -> Result<Value, JsonRpcError> {
    let call: CallToolParams = parse_params(params)?;
    let arguments = call.arguments.unwrap_or_else(|| json!({}));

    let output = match call.name.as_str() {
        catalog::SEARCH_STATIONS => match parse_arguments(arguments) {
            Ok(params) => to_value(tools::search_stations(state, params).await)?,
            Err(e) => to_value(StationsOutput::failed(&e))?,
        },
        catalog::SEARCH_TRIPS => match parse_arguments(arguments) {
            Ok(params) => to_value(tools::search_trips(state, params).await)?,
            Err(e) => to_value(TripsOutput::rejected(&e))?,
        },
        catalog::GET_DEPARTURES => match parse_arguments(arguments) {
            Ok(params) => to_value(tools::get_departures(state, params).await)?,
            Err(e) => to_value(DeparturesOutput::failed(&e))?,
        },
        other => return Err(JsonRpcError::invalid_params(format!("Unknown tool: {other}"))),
    };

    let is_error = output.get("error").is_some();
    let text = serde_json::to_string_pretty(&output).map_err(internal_error)?;

    to_value(CallToolResult {
        content: vec![Content::Text { text }],
        is_error,
    })
}

async fn read_resource(state: &AppState, params: Option<Value>) -> Result<Value, JsonRpcError> {
    let params: ReadResourceParams = parse_params(params)?;

    let code = params
        .uri
        .strip_prefix(STATION_URI_PREFIX)
        .map(|code| code.trim_end_matches('/'))
        .filter(|code| !code.is_empty())
        .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown resource: {}", params.uri)))?;

    let text = tools::station_profile(state, code).await;

    Ok(json!({
        "contents": [{
            "uri": params.uri,
            "mimeType": "text/markdown",
            "text": text
        }]
    }))
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {e}")))
}

/// Tool arguments that fail to parse are reported inside the tool result.
fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, NsError> {
    serde_json::from_value(arguments).map_err(|e| {
        debug!(error = %e, "invalid tool arguments");
        NsError::Validation(format!("Invalid arguments: {e}"))
    })
}

fn to_value<T: Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(internal_error)
}

fn internal_error(e: serde_json::Error) -> JsonRpcError {
    JsonRpcError::new(JsonRpcError::INTERNAL_ERROR, format!("Internal error: {e}"))
}
