//! MCP tool-invocation layer on top of JSON-RPC: the fixed method set and
//! the payloads those methods exchange.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Methods
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The methods the server understands. Anything else is "method not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsInvoke,
    Shutdown,
    Exit,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Initialize,
        Method::ToolsList,
        Method::ToolsInvoke,
        Method::Shutdown,
        Method::Exit,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::ToolsList => "tools/list",
            Method::ToolsInvoke => "tools/invoke",
            Method::Shutdown => "shutdown",
            Method::Exit => "exit",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Payloads
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Server identity returned by `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// The result payload of `initialize`. Capabilities are always empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub server_info: ServerInfo,
    pub capabilities: Value,
}

impl InitializeResult {
    pub fn new(server_info: ServerInfo) -> Self {
        Self {
            server_info,
            capabilities: Value::Object(Default::default()),
        }
    }
}

/// A tool as advertised by `tools/list`: no handler, no schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

/// The result payload of `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolSummary>,
}

/// `tools/invoke` params after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeParams {
    pub name: String,
    /// Tool arguments; `{}` when the caller sent none or `null`.
    pub parameters: Value,
}

impl InvokeParams {
    /// Pull `name` and `parameters` out of raw `params`.
    ///
    /// Returns `None` when `name` is absent, not a string, or empty.
    pub fn from_params(params: Option<&Value>) -> Option<Self> {
        let params = params?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())?
            .to_owned();
        let parameters = match params.get("parameters") {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(p) => p.clone(),
        };
        Some(Self { name, parameters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_names_round_trip() {
        for m in Method::ALL {
            assert_eq!(Method::from_name(m.as_str()), Some(m));
        }
        assert_eq!(Method::from_name("tools/call"), None);
        assert_eq!(Method::from_name("Initialize"), None);
    }

    #[test]
    fn initialize_result_uses_camel_case() {
        let result = InitializeResult::new(ServerInfo {
            name: "makebridge".into(),
            version: "0.1.0".into(),
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({"serverInfo": {"name": "makebridge", "version": "0.1.0"}, "capabilities": {}})
        );
    }

    #[test]
    fn invoke_params_default_to_empty_object() {
        let p = InvokeParams::from_params(Some(&json!({"name": "list_apps"}))).unwrap();
        assert_eq!(p.parameters, json!({}));

        let p = InvokeParams::from_params(Some(&json!({"name": "list_apps", "parameters": null})))
            .unwrap();
        assert_eq!(p.parameters, json!({}));
    }

    #[test]
    fn invoke_params_keep_arguments() {
        let p = InvokeParams::from_params(Some(&json!({
            "name": "run_scenario",
            "parameters": {"scenarioId": 12}
        })))
        .unwrap();
        assert_eq!(p.name, "run_scenario");
        assert_eq!(p.parameters["scenarioId"], 12);
    }

    #[test]
    fn invoke_params_require_a_name() {
        assert!(InvokeParams::from_params(None).is_none());
        assert!(InvokeParams::from_params(Some(&json!({}))).is_none());
        assert!(InvokeParams::from_params(Some(&json!({"name": ""}))).is_none());
        assert!(InvokeParams::from_params(Some(&json!({"name": 5}))).is_none());
        assert!(InvokeParams::from_params(Some(&json!(["run_scenario"]))).is_none());
    }
}
