//! Core types for tool handling: the handler trait, parameter contracts,
//! results, and errors.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// Result type for tool handlers.
pub type ToolResult = Result<Value, ToolError>;

/// Errors a tool handler can return.
///
/// These are plain domain failures. The dispatcher turns every one of them
/// into a `-32000` response whose message is this error's `Display`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("missing required parameter '{0}'")]
    MissingParam(&'static str),
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: &'static str, reason: String },
    #[error("{0}")]
    Platform(String),
}

impl From<mb_domain::error::Error> for ToolError {
    fn from(e: mb_domain::error::Error) -> Self {
        ToolError::Platform(e.to_string())
    }
}

/// The JSON shape a parameter is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer or non-empty string.
    Id,
    String,
    Boolean,
    Integer,
    /// Passed through untouched.
    Any,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ParamKind::Id => "id",
            ParamKind::String => "string",
            ParamKind::Boolean => "boolean",
            ParamKind::Integer => "integer",
            ParamKind::Any => "any",
        })
    }
}

/// One entry of a tool's declared parameter contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

/// Implement this trait to expose an operation through `tools/invoke`.
///
/// Handlers validate their own parameters and never build JSON-RPC
/// envelopes; failures are returned as [`ToolError`].
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    /// Registry key. Must be unique.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Declared parameters, in documentation order.
    fn params(&self) -> &'static [ParamSpec] {
        &[]
    }

    /// Execute the tool with the caller's `parameters` object.
    async fn call(&self, params: Value) -> ToolResult;
}
