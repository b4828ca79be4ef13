//! AppState construction shared by `serve` and the in-process tests.

use std::sync::Arc;

use anyhow::Context;

use mb_domain::config::{Config, ConfigSeverity};
use mb_platform::ScenarioPlatform;
use mb_protocol::ServerInfo;

use crate::rpc::Dispatcher;
use crate::state::AppState;

/// Name reported in `initialize` and the liveness banner.
pub const SERVER_NAME: &str = "makebridge";

pub fn server_info() -> ServerInfo {
    ServerInfo {
        name: SERVER_NAME.into(),
        version: env!("CARGO_PKG_VERSION").into(),
    }
}

/// Validate config, build the platform client and tool registry, and
/// return a fully-wired [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("config validation failed with {errors} error(s)");
    }

    let platform =
        mb_platform::create_provider(&config.platform).context("creating platform client")?;
    Ok(app_state_with_platform(config, platform))
}

/// Wire an [`AppState`] around an already-built platform client.
pub fn app_state_with_platform(
    config: Arc<Config>,
    platform: Arc<dyn ScenarioPlatform>,
) -> AppState {
    let registry = Arc::new(mb_tools::builtin_registry(platform));
    tracing::info!(tools = registry.len(), "tool registry ready");

    let dispatcher = Arc::new(Dispatcher::new(registry.clone(), server_info()));

    AppState {
        config,
        registry,
        dispatcher,
    }
}
