//! `mb-gateway`: the makebridge server: HTTP/WebSocket surface, JSON-RPC
//! dispatch and the CLI behind the `makebridge` binary.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod rpc;
pub mod session;
pub mod state;
