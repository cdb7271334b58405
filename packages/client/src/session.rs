//! WebSocket chat session.
//!
//! A `ChatSession` owns the socket: a reader task decodes server events into
//! an inbox and a writer task encodes queued client events. Both tasks are
//! aborted when the session is dropped.

use agora_server::infrastructure::dto::websocket::{
    ClientEvent, SendMessagePayload, ServerEvent, TypingPayload,
};
use agora_shared::time::display_time_now;
use futures_util::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::{error::ClientError, url::websocket_url};

enum Outgoing {
    Event(ClientEvent),
    Close,
}

/// Cloneable sender half of a session
#[derive(Clone)]
pub struct SessionHandle {
    outgoing: mpsc::UnboundedSender<Outgoing>,
}

impl SessionHandle {
    /// Queue a raw client event
    pub fn emit(&self, event: ClientEvent) -> Result<(), ClientError> {
        self.outgoing
            .send(Outgoing::Event(event))
            .map_err(|_| ClientError::Closed)
    }

    /// Join `room`, leaving the current one
    pub fn join_room(&self, room: &str) -> Result<(), ClientError> {
        self.emit(ClientEvent::JoinRoom(room.to_string()))
    }

    /// Leave the current room, if any
    pub fn leave_room(&self) -> Result<(), ClientError> {
        self.emit(ClientEvent::LeaveRoom)
    }

    /// Send a message stamped with the local display time.
    ///
    /// Returns the stamped time so the caller can echo the message locally;
    /// the server never sends it back to its sender.
    pub fn send_message(
        &self,
        room: &str,
        author: Option<&str>,
        message: &str,
    ) -> Result<String, ClientError> {
        let time = display_time_now();
        self.emit(ClientEvent::SendMessage(SendMessagePayload {
            room: room.to_string(),
            message: message.to_string(),
            author: author.map(str::to_string),
            time: Some(time.clone()),
        }))?;
        Ok(time)
    }

    /// Raise or lower this connection's typing indicator in `room`
    pub fn typing(&self, room: &str, typing: bool) -> Result<(), ClientError> {
        self.emit(ClientEvent::Typing(TypingPayload {
            typing,
            room: room.to_string(),
        }))
    }
}

/// An open connection to the chat server
pub struct ChatSession {
    handle: SessionHandle,
    inbox: mpsc::UnboundedReceiver<ServerEvent>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl ChatSession {
    /// Connect to `server` (an `http(s)://` base URL)
    pub async fn connect(server: &str) -> Result<Self, ClientError> {
        let url = websocket_url(server)?;
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| ClientError::Connect {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        tracing::info!("Connected to {}", url);

        let (mut sink, mut stream) = stream.split();
        let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel::<Outgoing>();
        let (inbox_tx, inbox) = mpsc::unbounded_channel::<ServerEvent>();

        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerEvent>(text.as_str()) {
                            Ok(event) => {
                                if inbox_tx.send(event).is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::warn!("Ignoring unknown server frame: {}", e),
                        }
                    }
                    Ok(Message::Close(_)) => {
                        tracing::info!("Server closed the connection");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("WebSocket error: {}", e);
                        break;
                    }
                }
            }
        });

        let writer = tokio::spawn(async move {
            while let Some(outgoing) = outgoing_rx.recv().await {
                let frame = match outgoing {
                    Outgoing::Event(event) => match serde_json::to_string(&event) {
                        Ok(json) => Message::Text(json.into()),
                        Err(e) => {
                            tracing::error!("Failed to encode event: {}", e);
                            continue;
                        }
                    },
                    Outgoing::Close => {
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                };
                if let Err(e) = sink.send(frame).await {
                    tracing::warn!("Failed to send frame: {}", e);
                    break;
                }
            }
        });

        Ok(Self {
            handle: SessionHandle {
                outgoing: outgoing_tx,
            },
            inbox,
            reader,
            writer,
        })
    }

    /// A sender that can outlive borrows of the session
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// See [`SessionHandle::join_room`]
    pub fn join_room(&self, room: &str) -> Result<(), ClientError> {
        self.handle.join_room(room)
    }

    /// See [`SessionHandle::leave_room`]
    pub fn leave_room(&self) -> Result<(), ClientError> {
        self.handle.leave_room()
    }

    /// See [`SessionHandle::send_message`]
    pub fn send_message(
        &self,
        room: &str,
        author: Option<&str>,
        message: &str,
    ) -> Result<String, ClientError> {
        self.handle.send_message(room, author, message)
    }

    /// See [`SessionHandle::typing`]
    pub fn typing(&self, room: &str, typing: bool) -> Result<(), ClientError> {
        self.handle.typing(room, typing)
    }

    /// Next event from the server; `None` once the connection is gone
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        self.inbox.recv().await
    }

    /// Flush queued events, send a close frame and tear the session down
    pub async fn close(mut self) {
        if self.handle.outgoing.send(Outgoing::Close).is_ok() {
            let _ = (&mut self.writer).await;
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}
