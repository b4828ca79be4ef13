//! `mb-protocol`: JSON-RPC 2.0 envelope types and the MCP tool-invocation
//! payloads spoken over the makebridge WebSocket.
//!
//! Frames are single JSON objects; batching is not supported.

pub mod jsonrpc;
pub mod mcp;

pub use jsonrpc::{
    error_codes, parse_request, Outcome, Rejection, RequestId, RpcError, RpcRequest, RpcResponse,
    JSONRPC_VERSION,
};
pub use mcp::{InitializeResult, InvokeParams, Method, ServerInfo, ToolSummary, ToolsListResult};
