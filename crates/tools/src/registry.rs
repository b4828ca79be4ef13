//! Tool registry: an ordered, name-unique table of tool handlers.

use std::collections::HashMap;
use std::sync::Arc;

use mb_protocol::ToolSummary;

use crate::types::Tool;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
}

/// Registry of tool handlers.
///
/// Iteration and [`summaries`](Self::summaries) follow registration order,
/// which is the order `tools/list` advertises. Lookups are exact-match on
/// the tool name.
///
/// ```rust,no_run
/// # use mb_tools::ToolRegistry;
/// let mut reg = ToolRegistry::new();
/// // reg.register(ListScenarios::new(platform.clone()))?;
/// // reg.register(RunScenario::new(platform))?;
/// ```
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name.
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn register<T: Tool>(&mut self, tool: T) -> Result<&mut Self, RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a pre-wrapped tool handler.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<&mut Self, RegistryError> {
        let name = tool.name();
        if self.index.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_owned()));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(self)
    }

    /// Look up a handler by exact tool name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Name and description of every tool, in registration order.
    pub fn summaries(&self) -> Vec<ToolSummary> {
        self.tools
            .iter()
            .map(|t| ToolSummary {
                name: t.name().to_owned(),
                description: t.description().to_owned(),
            })
            .collect()
    }

    /// All registered tool names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
