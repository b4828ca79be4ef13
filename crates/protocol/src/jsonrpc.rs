//! JSON-RPC 2.0 envelope types.
//!
//! Every inbound frame yields exactly one [`RpcResponse`]: either the
//! method's result or an [`RpcError`]. Envelope problems are detected by
//! [`parse_request`] before any method runs.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC error codes, plus the implementation-defined server
/// error used for tool failures.
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const SERVER_ERROR: i64 = -32000;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request ids
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A request correlation id. Numbers keep their original representation
/// so the echoed id is byte-identical to the one received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    String(String),
}

impl RequestId {
    /// Extract an id from a raw envelope member. Anything that is not a
    /// number or a string counts as "no usable id".
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Requests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A validated JSON-RPC 2.0 request.
///
/// A `None` id is allowed (notification style) but still gets a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RpcRequest {
    pub fn new(id: Option<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Why a frame never reached method dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub id: Option<RequestId>,
    pub error: RpcError,
}

impl Rejection {
    pub fn into_response(self) -> RpcResponse {
        RpcResponse::error(self.id, self.error)
    }
}

/// Parse and validate one inbound frame.
///
/// * Not JSON → `-32700`, id `null`.
/// * Not a single object, wrong/missing `jsonrpc`, or missing/empty
///   `method` → `-32600`, with the request's id when it had a usable one.
///
/// The version member is `jsonrpc`; `protocolVersion` is accepted in its
/// place for clients that use that spelling.
pub fn parse_request(raw: &str) -> Result<RpcRequest, Rejection> {
    let value: Value = serde_json::from_str(raw).map_err(|_| Rejection {
        id: None,
        error: RpcError::parse_error(),
    })?;

    let Value::Object(mut obj) = value else {
        return Err(Rejection {
            id: None,
            error: RpcError::invalid_request("expected a single JSON object"),
        });
    };

    let id = obj.get("id").and_then(RequestId::from_value);
    let reject = |reason: &str| Rejection {
        id: id.clone(),
        error: RpcError::invalid_request(reason),
    };

    if version_of(&obj) != Some(JSONRPC_VERSION) {
        return Err(reject("jsonrpc must be \"2.0\""));
    }

    let method = match obj.remove("method") {
        Some(Value::String(m)) if !m.is_empty() => m,
        _ => return Err(reject("method must be a non-empty string")),
    };

    let params = match obj.remove("params") {
        None | Some(Value::Null) => None,
        Some(p) => Some(p),
    };

    Ok(RpcRequest::new(id, method, params))
}

fn version_of(obj: &Map<String, Value>) -> Option<&str> {
    obj.get("jsonrpc")
        .or_else(|| obj.get("protocolVersion"))
        .and_then(Value::as_str)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Responses
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A JSON-RPC 2.0 response. `id` is always serialized (as `null` when
/// unknown) and exactly one of `result` / `error` is present.
///
/// The version is written under both `jsonrpc` and `protocolVersion`, so
/// clients reading either spelling find it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcResponse {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(rename = "protocolVersion", default = "default_version")]
    pub protocol_version: String,
    pub id: Option<RequestId>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

fn default_version() -> String {
    JSONRPC_VERSION.into()
}

/// Either member of a response. `Result(Value::Null)` serializes as
/// `"result": null`, which `shutdown` and `exit` rely on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

impl RpcResponse {
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            protocol_version: JSONRPC_VERSION.into(),
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn error(id: Option<RequestId>, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            protocol_version: JSONRPC_VERSION.into(),
            id,
            outcome: Outcome::Error(error),
        }
    }

    /// Check if the response represents an error.
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// The error code, if this is an error response.
    pub fn error_code(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Error(e) => Some(e.code),
            Outcome::Result(_) => None,
        }
    }

    /// Extract the result value, returning the error if the response is an error.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.outcome {
            Outcome::Result(v) => Ok(v),
            Outcome::Error(e) => Err(e),
        }
    }

    /// Serialize for the wire.
    pub fn to_json(&self) -> String {
        // A response holds only strings, numbers and `Value`s, none of
        // which can fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"jsonrpc":"2.0","protocolVersion":"2.0","id":null,"error":{{"code":{},"message":"response serialization failed"}}}}"#,
                error_codes::SERVER_ERROR
            )
        })
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error() -> Self {
        Self::new(error_codes::PARSE_ERROR, "Parse error: payload is not valid JSON")
    }

    pub fn invalid_request(reason: &str) -> Self {
        Self::new(error_codes::INVALID_REQUEST, format!("Invalid Request: {reason}"))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(error_codes::METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(error_codes::METHOD_NOT_FOUND, format!("Unknown tool: {name}"))
    }

    pub fn invalid_params(reason: &str) -> Self {
        Self::new(error_codes::INVALID_PARAMS, format!("Invalid params: {reason}"))
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::SERVER_ERROR, message)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
