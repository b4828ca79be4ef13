//! The `ScenarioPlatform` trait defines the interface for automation
//! platform backends (REST, test doubles).

use async_trait::async_trait;
use mb_domain::error::Result;
use serde_json::Value;

use crate::types::{CreateScenario, ScenarioId};

/// Abstraction over the platform's scenario and app resources.
///
/// Responses are passed through as raw JSON; tool handlers pick out the
/// fields they report. Every failure is a readable `mb_domain::error::Error`.
#[async_trait]
pub trait ScenarioPlatform: Send + Sync {
    /// List all scenarios (GET /scenarios).
    async fn list_scenarios(&self) -> Result<Value>;

    /// Scenario details (GET /scenarios/{id}).
    async fn get_scenario(&self, id: &ScenarioId) -> Result<Value>;

    /// Start a run (POST /scenarios/{id}/run).
    async fn run_scenario(&self, id: &ScenarioId) -> Result<Value>;

    /// Activate or deactivate (PATCH /scenarios/{id}).
    async fn set_scenario_active(&self, id: &ScenarioId, active: bool) -> Result<Value>;

    /// Create a scenario (POST /scenarios).
    async fn create_scenario(&self, req: CreateScenario) -> Result<Value>;

    /// List available apps (GET /apps).
    async fn list_apps(&self) -> Result<Value>;

    /// Execution history (GET /scenarios/{id}/history?limit=).
    async fn scenario_history(&self, id: &ScenarioId, limit: u32) -> Result<Value>;
}
