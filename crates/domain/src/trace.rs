use serde::Serialize;

/// Structured trace events emitted across all makebridge crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    /// One outbound HTTP attempt against the automation platform.
    /// `status` is 0 when no response was received.
    PlatformCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    /// One JSON-RPC frame fully handled. `code` is `None` on success.
    RpcHandled {
        method: String,
        code: Option<i64>,
        duration_ms: u64,
    },
    SessionClosed {
        session_id: String,
        reason: String,
        frames: u64,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "mb_event");
    }
}
