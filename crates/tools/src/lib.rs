//! Scenario tools exposed over MCP `tools/invoke`.
//!
//! - [`Tool`]: one named async operation with a declared parameter contract
//! - [`ToolRegistry`]: the ordered, name-unique table the dispatcher reads
//! - [`builtin_registry`]: the seven scenario tools, in advertised order

pub mod params;
pub mod registry;
pub mod scenarios;
pub mod types;

pub use registry::{RegistryError, ToolRegistry};
pub use types::{ParamKind, ParamSpec, Tool, ToolError, ToolResult};

use std::sync::Arc;

use mb_platform::ScenarioPlatform;

/// Build the registry of built-in tools, all sharing one platform client.
pub fn builtin_registry(platform: Arc<dyn ScenarioPlatform>) -> ToolRegistry {
    let mut reg = ToolRegistry::new();
    for tool in scenarios::all(platform) {
        // Built-in names are distinct literals.
        if let Err(e) = reg.register_arc(tool) {
            tracing::error!(error = %e, "built-in tool skipped");
        }
    }
    reg
}
