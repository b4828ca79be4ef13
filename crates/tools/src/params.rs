//! Parameter extraction shared by the scenario tools.
//!
//! "Missing" follows JavaScript truthiness, which is what existing MCP
//! clients of this server were written against: `null`, `false`, `0` and
//! `""` all count as absent. Booleans are the exception, where only a real
//! absence is missing and `false` is a value.

use mb_platform::ScenarioId;
use serde_json::Value;

use crate::types::ToolError;

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A present, truthy member of `params`.
fn present<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| is_truthy(v))
}

/// Required scenario id: a non-empty string or a positive integer.
///
/// Stricter than plain truthiness for strings: surrounding whitespace is
/// trimmed before the id goes into a URL path, and a whitespace-only id
/// counts as missing.
pub fn scenario_id(params: &Value, name: &'static str) -> Result<ScenarioId, ToolError> {
    match present(params, name) {
        None => Err(ToolError::MissingParam(name)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ToolError::MissingParam(name)),
        Some(Value::String(s)) => Ok(ScenarioId::new(s.trim())),
        Some(Value::Number(n)) => n.as_u64().map(|n| ScenarioId::new(n.to_string())).ok_or_else(|| {
            ToolError::InvalidParam {
                name,
                reason: format!("expected a positive integer, got {n}"),
            }
        }),
        Some(_) => Err(ToolError::InvalidParam {
            name,
            reason: "expected a string or an integer".into(),
        }),
    }
}

/// Required boolean. Absence is missing; `false` is a valid value.
pub fn required_bool(params: &Value, name: &'static str) -> Result<bool, ToolError> {
    match params.get(name) {
        None => Err(ToolError::MissingParam(name)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(ToolError::InvalidParam {
            name,
            reason: format!("expected a boolean, got {}", type_name(other)),
        }),
    }
}

/// Required non-empty string.
pub fn required_string(params: &Value, name: &'static str) -> Result<String, ToolError> {
    match present(params, name) {
        None => Err(ToolError::MissingParam(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ToolError::InvalidParam {
            name,
            reason: format!("expected a string, got {}", type_name(other)),
        }),
    }
}

/// Optional value forwarded only when truthy.
pub fn truthy(params: &Value, name: &str) -> Option<Value> {
    present(params, name).cloned()
}

/// Optional non-negative integer with a default for absent or `null`.
pub fn optional_u32(params: &Value, name: &'static str, default: u32) -> Result<u32, ToolError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ToolError::InvalidParam {
                name,
                reason: format!("expected a non-negative integer, got {n}"),
            }),
        Some(other) => Err(ToolError::InvalidParam {
            name,
            reason: format!("expected a non-negative integer, got {}", type_name(other)),
        }),
    }
}

/// Read a field of a platform response, falling back to the nested
/// `scenario` object the platform wraps single scenarios in.
pub fn scenario_field(response: &Value, key: &str) -> Value {
    response
        .get(key)
        .or_else(|| response.get("scenario").and_then(|s| s.get(key)))
        .cloned()
        .unwrap_or(Value::Null)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
