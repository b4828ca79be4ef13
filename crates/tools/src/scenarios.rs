//! The built-in scenario tools. Each one validates its parameters, makes a
//! single platform call and shapes the reply.

use std::sync::Arc;

use async_trait::async_trait;
use mb_platform::{CreateScenario, ScenarioPlatform};
use serde_json::{json, Value};

use crate::params::{self, scenario_field};
use crate::types::{ParamKind, ParamSpec, Tool, ToolResult};

const DEFAULT_HISTORY_LIMIT: u32 = 10;

const SCENARIO_ID: ParamSpec = ParamSpec {
    name: "scenarioId",
    kind: ParamKind::Id,
    required: true,
    description: "Scenario identifier",
};

/// Every built-in tool, in the order `tools/list` advertises them.
pub fn all(platform: Arc<dyn ScenarioPlatform>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListScenarios::new(platform.clone())),
        Arc::new(RunScenario::new(platform.clone())),
        Arc::new(ToggleScenario::new(platform.clone())),
        Arc::new(GetScenario::new(platform.clone())),
        Arc::new(CreateScenarioTool::new(platform.clone())),
        Arc::new(ListApps::new(platform.clone())),
        Arc::new(GetScenarioHistory::new(platform)),
    ]
}

macro_rules! platform_tool {
    ($ty:ident) => {
        pub struct $ty {
            platform: Arc<dyn ScenarioPlatform>,
        }

        impl $ty {
            pub fn new(platform: Arc<dyn ScenarioPlatform>) -> Self {
                Self { platform }
            }
        }
    };
}

platform_tool!(ListScenarios);
platform_tool!(RunScenario);
platform_tool!(ToggleScenario);
platform_tool!(GetScenario);
platform_tool!(CreateScenarioTool);
platform_tool!(ListApps);
platform_tool!(GetScenarioHistory);

// ── list_scenarios ──────────────────────────────────────────────────

#[async_trait]
impl Tool for ListScenarios {
    fn name(&self) -> &'static str {
        "list_scenarios"
    }

    fn description(&self) -> &'static str {
        "Lists all scenarios in Make"
    }

    async fn call(&self, _params: Value) -> ToolResult {
        let scenarios = self.platform.list_scenarios().await?;
        Ok(json!({ "scenarios": scenarios }))
    }
}

// ── run_scenario ────────────────────────────────────────────────────

#[async_trait]
impl Tool for RunScenario {
    fn name(&self) -> &'static str {
        "run_scenario"
    }

    fn description(&self) -> &'static str {
        "Runs a scenario in Make"
    }

    fn params(&self) -> &'static [ParamSpec] {
        &[SCENARIO_ID]
    }

    async fn call(&self, params: Value) -> ToolResult {
        let id = params::scenario_id(&params, "scenarioId")?;
        let result = self.platform.run_scenario(&id).await?;
        Ok(json!({
            "success": true,
            "executionId": scenario_field(&result, "executionId"),
            "message": format!("Scenario {id} has been started"),
        }))
    }
}

// ── toggle_scenario ─────────────────────────────────────────────────

#[async_trait]
impl Tool for ToggleScenario {
    fn name(&self) -> &'static str {
        "toggle_scenario"
    }

    fn description(&self) -> &'static str {
        "Activates or deactivates a scenario in Make"
    }

    fn params(&self) -> &'static [ParamSpec] {
        &[
            SCENARIO_ID,
            ParamSpec {
                name: "active",
                kind: ParamKind::Boolean,
                required: true,
                description: "true to activate, false to deactivate",
            },
        ]
    }

    async fn call(&self, params: Value) -> ToolResult {
        let id = params::scenario_id(&params, "scenarioId")?;
        let active = params::required_bool(&params, "active")?;
        let result = self.platform.set_scenario_active(&id, active).await?;
        let verb = if active { "activated" } else { "deactivated" };
        Ok(json!({
            "success": true,
            "scenarioId": scenario_field(&result, "id"),
            "active": scenario_field(&result, "active"),
            "message": format!("Scenario {id} has been {verb}"),
        }))
    }
}

// ── get_scenario ────────────────────────────────────────────────────

#[async_trait]
impl Tool for GetScenario {
    fn name(&self) -> &'static str {
        "get_scenario"
    }

    fn description(&self) -> &'static str {
        "Gets the details of a scenario in Make"
    }

    fn params(&self) -> &'static [ParamSpec] {
        &[SCENARIO_ID]
    }

    async fn call(&self, params: Value) -> ToolResult {
        let id = params::scenario_id(&params, "scenarioId")?;
        let scenario = self.platform.get_scenario(&id).await?;
        Ok(json!({ "scenario": scenario }))
    }
}

// ── create_scenario ─────────────────────────────────────────────────

#[async_trait]
impl Tool for CreateScenarioTool {
    fn name(&self) -> &'static str {
        "create_scenario"
    }

    fn description(&self) -> &'static str {
        "Creates a new scenario in Make"
    }

    fn params(&self) -> &'static [ParamSpec] {
        &[
            ParamSpec {
                name: "name",
                kind: ParamKind::String,
                required: true,
                description: "Name of the new scenario",
            },
            ParamSpec {
                name: "folderID",
                kind: ParamKind::Any,
                required: false,
                description: "Folder to create the scenario in",
            },
        ]
    }

    async fn call(&self, params: Value) -> ToolResult {
        let name = params::required_string(&params, "name")?;
        let req = CreateScenario {
            name: name.clone(),
            folder_id: params::truthy(&params, "folderID"),
        };
        let result = self.platform.create_scenario(req).await?;
        Ok(json!({
            "success": true,
            "scenarioId": scenario_field(&result, "id"),
            "name": scenario_field(&result, "name"),
            "message": format!("Scenario \"{name}\" has been created"),
        }))
    }
}

// ── list_apps ───────────────────────────────────────────────────────

#[async_trait]
impl Tool for ListApps {
    fn name(&self) -> &'static str {
        "list_apps"
    }

    fn description(&self) -> &'static str {
        "Lists all apps available in Make"
    }

    async fn call(&self, _params: Value) -> ToolResult {
        let apps = self.platform.list_apps().await?;
        Ok(json!({ "apps": apps }))
    }
}

// ── get_scenario_history ────────────────────────────────────────────

#[async_trait]
impl Tool for GetScenarioHistory {
    fn name(&self) -> &'static str {
        "get_scenario_history"
    }

    fn description(&self) -> &'static str {
        "Gets the execution history of a scenario in Make"
    }

    fn params(&self) -> &'static [ParamSpec] {
        &[
            SCENARIO_ID,
            ParamSpec {
                name: "limit",
                kind: ParamKind::Integer,
                required: false,
                description: "Maximum number of executions (default 10)",
            },
        ]
    }

    async fn call(&self, params: Value) -> ToolResult {
        let id = params::scenario_id(&params, "scenarioId")?;
        let limit = params::optional_u32(&params, "limit", DEFAULT_HISTORY_LIMIT)?;
        let history = self.platform.scenario_history(&id, limit).await?;
        Ok(json!({ "history": history }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolError;
    use mb_domain::error::{Error, Result};
    use mb_platform::ScenarioId;
    use std::sync::Mutex;

    /// Records every call and answers with a canned response.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        reply: Value,
    }

    impl Recorder {
        fn replying(reply: Value) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                reply,
            })
        }

        fn record(&self, call: String) -> Result<Value> {
            self.calls.lock().unwrap().push(call);
            Ok(self.reply.clone())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScenarioPlatform for Recorder {
        async fn list_scenarios(&self) -> Result<Value> {
            self.record("list_scenarios".into())
        }
        async fn get_scenario(&self, id: &ScenarioId) -> Result<Value> {
            self.record(format!("get_scenario {id}"))
        }
        async fn run_scenario(&self, id: &ScenarioId) -> Result<Value> {
            self.record(format!("run_scenario {id}"))
        }
        async fn set_scenario_active(&self, id: &ScenarioId, active: bool) -> Result<Value> {
            self.record(format!("set_scenario_active {id} {active}"))
        }
        async fn create_scenario(&self, req: CreateScenario) -> Result<Value> {
            self.record(format!("create_scenario {}", serde_json::to_string(&req).unwrap()))
        }
        async fn list_apps(&self) -> Result<Value> {
            self.record("list_apps".into())
        }
        async fn scenario_history(&self, id: &ScenarioId, limit: u32) -> Result<Value> {
            self.record(format!("scenario_history {id} {limit}"))
        }
    }

    struct Down;

    #[async_trait]
    impl ScenarioPlatform for Down {
        async fn list_scenarios(&self) -> Result<Value> {
            Err(Error::Platform("list scenarios failed: connection refused".into()))
        }
        async fn get_scenario(&self, _id: &ScenarioId) -> Result<Value> {
            Err(Error::Platform("unreachable".into()))
        }
        async fn run_scenario(&self, id: &ScenarioId) -> Result<Value> {
            Err(Error::Platform(format!("run scenario {id} failed: timed out")))
        }
        async fn set_scenario_active(&self, _id: &ScenarioId, _active: bool) -> Result<Value> {
            Err(Error::Platform("unreachable".into()))
        }
        async fn create_scenario(&self, _req: CreateScenario) -> Result<Value> {
            Err(Error::Platform("unreachable".into()))
        }
        async fn list_apps(&self) -> Result<Value> {
            Err(Error::Auth("API token rejected".into()))
        }
        async fn scenario_history(&self, _id: &ScenarioId, _limit: u32) -> Result<Value> {
            Err(Error::Platform("unreachable".into()))
        }
    }

    #[test]
    fn tools_are_listed_in_advertised_order() {
        let names: Vec<&str> = all(Recorder::replying(json!({})))
            .iter()
            .map(|t| t.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "list_scenarios",
                "run_scenario",
                "toggle_scenario",
                "get_scenario",
                "create_scenario",
                "list_apps",
                "get_scenario_history",
            ]
        );
    }

    #[test]
    fn required_params_are_declared() {
        let tools = all(Recorder::replying(json!({})));
        let toggle = tools.iter().find(|t| t.name() == "toggle_scenario").unwrap();
        let required: Vec<&str> = toggle
            .params()
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect();
        assert_eq!(required, vec!["scenarioId", "active"]);
    }

    #[tokio::test]
    async fn list_scenarios_wraps_remote_payload() {
        let rec = Recorder::replying(json!([{"id": 1}]));
        let out = ListScenarios::new(rec.clone()).call(json!({})).await.unwrap();
        assert_eq!(out, json!({"scenarios": [{"id": 1}]}));
        assert_eq!(rec.calls(), vec!["list_scenarios"]);
    }

    #[tokio::test]
    async fn run_scenario_requires_an_id() {
        let rec = Recorder::replying(json!({}));
        let err = RunScenario::new(rec.clone()).call(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("scenarioId"));
        assert!(rec.calls().is_empty());
    }

    #[tokio::test]
    async fn run_scenario_reports_execution() {
        let rec = Recorder::replying(json!({"executionId": "e-1"}));
        let out = RunScenario::new(rec.clone())
            .call(json!({"scenarioId": 42}))
            .await
            .unwrap();
        assert_eq!(
            out,
            json!({"success": true, "executionId": "e-1", "message": "Scenario 42 has been started"})
        );
        assert_eq!(rec.calls(), vec!["run_scenario 42"]);
    }

    #[tokio::test]
    async fn run_scenario_without_execution_id_reports_null() {
        let rec = Recorder::replying(json!({}));
        let out = RunScenario::new(rec).call(json!({"scenarioId": "7"})).await.unwrap();
        assert_eq!(out["executionId"], Value::Null);
    }

    #[tokio::test]
    async fn toggle_accepts_false() {
        let rec = Recorder::replying(json!({"scenario": {"id": 5, "active": false}}));
        let out = ToggleScenario::new(rec.clone())
            .call(json!({"scenarioId": 5, "active": false}))
            .await
            .unwrap();
        assert_eq!(
            out,
            json!({
                "success": true,
                "scenarioId": 5,
                "active": false,
                "message": "Scenario 5 has been deactivated"
            })
        );
        assert_eq!(rec.calls(), vec!["set_scenario_active 5 false"]);
    }

    #[tokio::test]
    async fn toggle_without_active_fails() {
        let rec = Recorder::replying(json!({}));
        let err = ToggleScenario::new(rec.clone())
            .call(json!({"scenarioId": 5}))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::MissingParam("active"));
        assert!(rec.calls().is_empty());
    }

    #[tokio::test]
    async fn toggle_activation_message() {
        let rec = Recorder::replying(json!({"id": 5, "active": true}));
        let out = ToggleScenario::new(rec)
            .call(json!({"scenarioId": "5", "active": true}))
            .await
            .unwrap();
        assert_eq!(out["message"], "Scenario 5 has been activated");
    }

    #[tokio::test]
    async fn get_scenario_wraps_details() {
        let rec = Recorder::replying(json!({"scenario": {"id": 3}}));
        let out = GetScenario::new(rec.clone())
            .call(json!({"scenarioId": 3}))
            .await
            .unwrap();
        assert_eq!(out, json!({"scenario": {"scenario": {"id": 3}}}));
        assert_eq!(rec.calls(), vec!["get_scenario 3"]);
    }

    #[tokio::test]
    async fn create_omits_falsy_folder() {
        let rec = Recorder::replying(json!({"id": 11, "name": "Leads"}));
        let tool = CreateScenarioTool::new(rec.clone());
        let out = tool
            .call(json!({"name": "Leads", "folderID": 0}))
            .await
            .unwrap();
        assert_eq!(
            out,
            json!({
                "success": true,
                "scenarioId": 11,
                "name": "Leads",
                "message": "Scenario \"Leads\" has been created"
            })
        );
        tool.call(json!({"name": "Leads", "folderID": 4})).await.unwrap();
        assert_eq!(
            rec.calls(),
            vec![
                r#"create_scenario {"name":"Leads"}"#,
                r#"create_scenario {"name":"Leads","folderID":4}"#,
            ]
        );
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let rec = Recorder::replying(json!({}));
        let err = CreateScenarioTool::new(rec)
            .call(json!({"folderID": 4}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter 'name'");
    }

    #[tokio::test]
    async fn list_apps_wraps_remote_payload() {
        let rec = Recorder::replying(json!({"apps": ["http"]}));
        let out = ListApps::new(rec).call(json!({})).await.unwrap();
        assert_eq!(out, json!({"apps": {"apps": ["http"]}}));
    }

    #[tokio::test]
    async fn history_defaults_limit_to_ten() {
        let rec = Recorder::replying(json!([]));
        let tool = GetScenarioHistory::new(rec.clone());
        let out = tool.call(json!({"scenarioId": 9})).await.unwrap();
        assert_eq!(out, json!({"history": []}));
        tool.call(json!({"scenarioId": 9, "limit": 3})).await.unwrap();
        assert_eq!(rec.calls(), vec!["scenario_history 9 10", "scenario_history 9 3"]);
    }

    #[tokio::test]
    async fn history_rejects_negative_limit() {
        let rec = Recorder::replying(json!([]));
        let err = GetScenarioHistory::new(rec.clone())
            .call(json!({"scenarioId": 9, "limit": -1}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParam { name: "limit", .. }));
        assert!(rec.calls().is_empty());
    }

    #[tokio::test]
    async fn platform_failures_keep_their_message() {
        let down: Arc<dyn ScenarioPlatform> = Arc::new(Down);
        let err = RunScenario::new(down.clone())
            .call(json!({"scenarioId": 1}))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::Platform("run scenario 1 failed: timed out".into()));

        let err = ListApps::new(down).call(json!({})).await.unwrap_err();
        assert!(err.to_string().contains("API token rejected"));
    }
}
