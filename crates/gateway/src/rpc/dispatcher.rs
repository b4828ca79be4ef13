//! Method routing for the MCP endpoint.
//!
//! Flow per frame:
//! 1. `parse_request` validates the envelope (`-32700` / `-32600` here)
//! 2. `Method::from_name` picks a handler, unknown names get `-32601`
//! 3. the handler's outcome becomes exactly one [`RpcResponse`]
//!
//! Every failure below the envelope is mapped here; tool handlers only
//! ever return [`ToolError`](mb_tools::ToolError).

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use mb_domain::trace::TraceEvent;
use mb_protocol::{
    parse_request, InitializeResult, InvokeParams, Method, RequestId, RpcError, RpcRequest,
    RpcResponse, ServerInfo, ToolsListResult,
};
use mb_tools::ToolRegistry;

/// The response to one frame, plus whether the session should close once
/// it has been sent.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub response: RpcResponse,
    pub close: bool,
}

impl Dispatched {
    fn reply(response: RpcResponse) -> Self {
        Self {
            response,
            close: false,
        }
    }
}

/// Stateless request router shared by every session.
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    server_info: ServerInfo,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, server_info: ServerInfo) -> Self {
        Self {
            registry,
            server_info,
        }
    }

    /// Handle one raw text frame.
    pub async fn dispatch(&self, raw: &str) -> Dispatched {
        let started = Instant::now();
        let (method, dispatched) = match parse_request(raw) {
            Ok(req) => {
                let method = req.method.clone();
                (method, self.handle(req).await)
            }
            Err(rejection) => {
                tracing::debug!(code = rejection.error.code, "frame rejected");
                (String::new(), Dispatched::reply(rejection.into_response()))
            }
        };

        tracing::debug!(response = %dispatched.response.to_json(), "outbound envelope");

        TraceEvent::RpcHandled {
            method,
            code: dispatched.response.error_code(),
            duration_ms: started.elapsed().as_millis() as u64,
        }
        .emit();

        dispatched
    }

    /// Whether `raw` is a well-formed `exit` request. Sessions check this
    /// before reading the next frame so nothing after `exit` is dispatched.
    pub fn is_exit(raw: &str) -> bool {
        parse_request(raw)
            .ok()
            .and_then(|req| Method::from_name(&req.method))
            == Some(Method::Exit)
    }

    /// Route a validated request to its method handler.
    pub async fn handle(&self, req: RpcRequest) -> Dispatched {
        let Some(method) = Method::from_name(&req.method) else {
            tracing::debug!(method = %req.method, "unknown method");
            return Dispatched::reply(RpcResponse::error(
                req.id,
                RpcError::method_not_found(&req.method),
            ));
        };

        match method {
            Method::Initialize => Dispatched::reply(reply(
                req.id,
                &InitializeResult::new(self.server_info.clone()),
            )),
            Method::ToolsList => Dispatched::reply(reply(
                req.id,
                &ToolsListResult {
                    tools: self.registry.summaries(),
                },
            )),
            Method::ToolsInvoke => Dispatched::reply(self.invoke(req).await),
            Method::Shutdown => Dispatched::reply(RpcResponse::success(req.id, Value::Null)),
            Method::Exit => Dispatched {
                response: RpcResponse::success(req.id, Value::Null),
                close: true,
            },
        }
    }

    async fn invoke(&self, req: RpcRequest) -> RpcResponse {
        let Some(params) = InvokeParams::from_params(req.params.as_ref()) else {
            return RpcResponse::error(
                req.id,
                RpcError::invalid_params("params.name must be a non-empty string"),
            );
        };

        let Some(tool) = self.registry.get(&params.name) else {
            tracing::debug!(tool = %params.name, "unknown tool");
            return RpcResponse::error(req.id, RpcError::unknown_tool(&params.name));
        };

        match tool.call(params.parameters).await {
            Ok(result) => {
                tracing::debug!(tool = %params.name, id = ?req.id, "tool succeeded");
                RpcResponse::success(req.id, result)
            }
            Err(e) => {
                tracing::warn!(tool = %params.name, id = ?req.id, error = %e, "tool failed");
                RpcResponse::error(req.id, RpcError::server_error(e.to_string()))
            }
        }
    }
}

fn reply<T: Serialize>(id: Option<RequestId>, payload: &T) -> RpcResponse {
    match serde_json::to_value(payload) {
        Ok(v) => RpcResponse::success(id, v),
        Err(e) => RpcResponse::error(id, RpcError::server_error(e.to_string())),
    }
}
