//! `mb-platform`: client crate for the automation platform's REST API.
//!
//! Provides the [`ScenarioPlatform`] trait that tool handlers program
//! against, and the production REST implementation
//! ([`RestPlatformClient`]).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use mb_domain::config::PlatformConfig;
//! use mb_platform::{RestPlatformClient, ScenarioPlatform};
//!
//! # async fn example() -> mb_domain::error::Result<()> {
//! let cfg = PlatformConfig::default();
//! let client = RestPlatformClient::new(&cfg, cfg.resolve_api_token())?;
//!
//! let scenarios = client.list_scenarios().await?;
//! println!("{scenarios}");
//! # Ok(())
//! # }
//! ```

pub mod provider;
pub mod rest;
pub mod types;

pub use provider::ScenarioPlatform;
pub use rest::{from_reqwest, RestPlatformClient};
pub use types::{CreateScenario, ScenarioId};

use std::sync::Arc;

use mb_domain::config::PlatformConfig;
use mb_domain::error::Result;

/// Build the shared platform client from config and the process
/// environment. A missing token is logged, not fatal: the server still
/// starts and every tool call reports the problem to its caller.
pub fn create_provider(cfg: &PlatformConfig) -> Result<Arc<dyn ScenarioPlatform>> {
    let token = cfg.resolve_api_token();
    if token.is_none() {
        tracing::warn!(
            env = %cfg.api_token_env,
            "platform API token not set; tool calls will fail until it is provided"
        );
    }
    let client = RestPlatformClient::new(cfg, token)?;
    tracing::info!(base_url = %client.base_url(), "platform client ready");
    Ok(Arc::new(client))
}
