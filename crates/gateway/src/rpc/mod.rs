//! JSON-RPC request handling: one inbound frame in, one response out.

pub mod dispatcher;

pub use dispatcher::{Dispatched, Dispatcher};
