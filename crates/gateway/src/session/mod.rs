//! Per-connection WebSocket sessions.

pub mod ws;

pub use ws::{mcp_ws, run_session};
