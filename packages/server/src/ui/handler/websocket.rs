//! WebSocket connection handler: handshake gate, room wiring, routing.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket},
    },
    extract::ws::WebSocketUpgrade,
    http::{StatusCode, header::AUTHORIZATION},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::Session,
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::{AppState, ConnectQuery},
    usecase::{
        ConnectError, ConnectSessionUseCase, DisconnectSessionUseCase, HandshakeRequest,
        RouteMessageUseCase,
    },
};

/// Handshake endpoint. The gate runs before the upgrade: a rejected
/// connection never joins a room and the attempt terminates with a reason
/// string in the response body.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> Response {
    let bearer_token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let request = HandshakeRequest {
        project_id: query.project_id,
        auth_token: query.token,
        bearer_token,
    };

    // channel feeding this connection's send task; registered with the
    // room on admit
    let (tx, rx) = mpsc::unbounded_channel();

    let gate = ConnectSessionUseCase::new(
        state.projects.clone(),
        state.tokens.clone(),
        state.registry.clone(),
    );
    match gate.execute(request, tx.clone()).await {
        Ok(session) => {
            ws.on_upgrade(move |socket| handle_socket(socket, state, session, tx, rx))
                .into_response()
        }
        Err(e) => {
            tracing::warn!("handshake rejected: {e}");
            let status = match e {
                ConnectError::MissingProject | ConnectError::InvalidProject(_) => {
                    StatusCode::BAD_REQUEST
                }
                ConnectError::MissingToken | ConnectError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                ConnectError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            };
            (status, e.to_string()).into_response()
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session: Session,
    self_tx: mpsc::UnboundedSender<String>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();

    // informational greeting; clients are free to ignore it
    let welcome = ServerEvent::Welcome {
        project_id: session.snapshot.project_id.as_str().to_string(),
        name: session.snapshot.name.clone(),
        users: session
            .snapshot
            .users
            .iter()
            .map(|u| u.as_str().to_string())
            .collect(),
    };
    let welcome_json =
        serde_json::to_string(&welcome).expect("server event serialization cannot fail");
    if let Err(e) = sender.send(Message::Text(welcome_json.into())).await {
        tracing::error!("failed to send welcome to '{}': {e}", session.connection_id);
        DisconnectSessionUseCase::new(state.registry.clone())
            .execute(&session)
            .await;
        return;
    }

    let router = Arc::new(RouteMessageUseCase::new(
        state.registry.clone(),
        state.ai.clone(),
    ));

    let recv_session = session.clone();
    let recv_router = router.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("websocket error: {e}");
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!("unparseable client event: {e}");
                            send_error_to_self(&self_tx, format!("malformed event: {e}"));
                            continue;
                        }
                    };

                    let ClientEvent::ProjectMessage { message, .. } = event;
                    // sender attribution comes from the session, never
                    // from the client payload
                    let prompt = recv_router.broadcast(&recv_session, message).await;

                    if let Some(prompt) = prompt {
                        // AI leg runs detached: a disconnect mid-request
                        // does not cancel it, and the reply goes to
                        // whoever is in the room when it resolves
                        let ai_router = recv_router.clone();
                        let ai_room = recv_session.room().clone();
                        let ai_tx = self_tx.clone();
                        tokio::spawn(async move {
                            match ai_router.invoke_ai(&prompt).await {
                                Ok(reply) => {
                                    ai_router.broadcast_ai_reply(&ai_room, reply).await;
                                }
                                Err(e) => {
                                    tracing::warn!("AI invocation failed: {e}");
                                    // delivered to the originating session
                                    // only, not the whole room
                                    send_error_to_self(&ai_tx, format!("AI request failed: {e}"));
                                }
                            }
                        });
                    }
                }
                Message::Close(_) => {
                    tracing::info!("client '{}' requested close", recv_session.connection_id);
                    break;
                }
                // ping/pong handled by the protocol layer
                _ => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // whichever side finishes first tears down the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    DisconnectSessionUseCase::new(state.registry.clone())
        .execute(&session)
        .await;
}

/// Queue an error event onto this connection's own channel. Failure here
/// means the send task already stopped; nothing left to tell.
fn send_error_to_self(tx: &mpsc::UnboundedSender<String>, message: String) {
    let event = ServerEvent::Error { message };
    let wire = serde_json::to_string(&event).expect("server event serialization cannot fail");
    let _ = tx.send(wire);
}
