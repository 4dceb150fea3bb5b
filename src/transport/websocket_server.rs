use std::sync::Arc;

use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};

use crate::server::AppState;
use crate::ws::handler::handle_socket;

/// GET /ws — attach an observer. No authentication; membership is purely
/// connection-lifetime scoped.
pub async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}
