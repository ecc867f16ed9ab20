//! WebSocket session against a project room.
//!
//! Connects with `projectId` and the bearer token in the query string,
//! encodes outgoing [`ClientEvent`]s, and decodes incoming
//! [`ServerEvent`]s for the REPL loop to dispatch.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use atelier_server::domain::ChatPayload;
use atelier_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use crate::error::ClientError;

/// A live, admitted connection to one project room.
pub struct WsSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsSession {
    /// Perform the handshake. A gate rejection surfaces as a websocket
    /// error carrying the HTTP status and reason.
    pub async fn connect(
        ws_base_url: &str,
        project_id: &str,
        token: &str,
    ) -> Result<Self, ClientError> {
        let url = format!("{ws_base_url}/ws?projectId={project_id}&token={token}");
        let (stream, _) = connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Send a plain chat line (which may carry the `@ai` trigger).
    pub async fn send_chat(&mut self, text: &str) -> Result<(), ClientError> {
        self.send_payload(ChatPayload::PlainText {
            text: text.to_string(),
        })
        .await
    }

    /// Broadcast a single-file edit to the room.
    pub async fn send_delta(&mut self, path: &str, content: &str) -> Result<(), ClientError> {
        self.send_payload(ChatPayload::FileDelta {
            path: path.to_string(),
            content: content.to_string(),
        })
        .await
    }

    async fn send_payload(&mut self, message: ChatPayload) -> Result<(), ClientError> {
        let event = ClientEvent::ProjectMessage {
            message,
            sender: None,
        };
        let wire = serde_json::to_string(&event)
            .map_err(|e| ClientError::Protocol(format!("failed to encode event: {e}")))?;
        self.stream.send(Message::Text(wire.into())).await?;
        Ok(())
    }

    /// The next decoded server event; `None` once the connection closed.
    pub async fn next_event(&mut self) -> Result<Option<ServerEvent>, ClientError> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                Message::Text(text) => {
                    let event = serde_json::from_str(&text).map_err(|e| {
                        ClientError::Protocol(format!("undecodable server event: {e}"))
                    })?;
                    return Ok(Some(event));
                }
                Message::Close(_) => return Ok(None),
                // ping/pong handled by the protocol layer
                _ => {}
            }
        }
        Ok(None)
    }

    /// Close the connection politely.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}
