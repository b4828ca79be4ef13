use std::sync::Arc;

use mb_domain::config::Config;
use mb_tools::ToolRegistry;

use crate::rpc::Dispatcher;

/// Shared application state passed to every handler and session.
///
/// Everything here is read-only after startup, so sessions share it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<ToolRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}
