pub mod health;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::session;
use crate::state::AppState;

/// Build the route table.
///
/// `/` serves both the WebSocket upgrade and the plain liveness banner;
/// `/health` is the JSON probe.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::mcp_ws))
        .route("/health", get(health::health))
}

/// The complete service: routes, HTTP tracing and state.
pub fn app(state: AppState) -> Router {
    router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
