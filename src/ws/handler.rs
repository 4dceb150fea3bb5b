use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use tracing::{debug, info, warn};

use crate::server::AppState;
use crate::station::Station;
use crate::ws::messages::OutgoingMessage;

/// Register an observer and queue its initial delivery: the current
/// snapshot to the joiner only, then the updated count to everyone. The
/// observer is registered before the count broadcast so it counts itself.
pub fn join_observer(station: &Station, observer_id: String, tx: flume::Sender<Message>) {
    let hub = station.hub();
    hub.join(observer_id, tx.clone());

    let snapshot = OutgoingMessage::RadioState(station.snapshot());
    if let Ok(json) = serde_json::to_string(&snapshot) {
        let _ = tx.send(Message::Text(json.into()));
    }
    hub.broadcast_listener_count();
}

/// Per-observer socket loop.
///
/// Everything the observer receives arrives through its flume sender,
/// starting with the join-time snapshot.
pub async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = flume::unbounded();
    let observer_id = uuid::Uuid::new_v4().to_string();

    let hub = state.station.hub();
    join_observer(&state.station, observer_id.clone(), tx);
    info!(
        "Observer connected: id={} listeners={}",
        observer_id,
        hub.count()
    );

    loop {
        tokio::select! {
            Ok(msg) = rx.recv_async() => {
                if let Err(e) = socket.send(msg).await {
                    debug!("Socket send error: observer={} err={}", observer_id, e);
                    break;
                }
            }
            msg = socket.recv() => {
                let msg = match msg {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        warn!("WebSocket error: observer={} err={}", observer_id, e);
                        break;
                    }
                    None => break,
                };
                match msg {
                    // Observers are read-only; inbound text is ignored.
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    hub.leave(&observer_id);
    hub.broadcast_listener_count();
    info!(
        "Observer disconnected: id={} listeners={}",
        observer_id,
        hub.count()
    );
}
