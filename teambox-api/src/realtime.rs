use std::collections::HashSet;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::ApiError;
use crate::models::{ChatMessage, Reaction};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);
const EVENT_BUFFER: usize = 256;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Typed events fanned out to every subscriber of the realtime channel.
///
/// `Connected` is emitted after every reconnect; consumers respond by
/// refetching history wholesale, there is no incremental catch-up.
#[derive(Debug, Clone)]
pub enum RealtimeEvent {
    Connected,
    Disconnected,
    MessageCreated(ChatMessage),
    ReactionsUpdated {
        group_id: String,
        message_id: String,
        reactions: Vec<Reaction>,
    },
}

/// Room subscription side of the realtime channel, the seam the chat
/// session depends on.
pub trait RoomControl {
    fn join_room(&self, room_id: &str);
    fn leave_room(&self, room_id: &str);
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WireEvent {
    MessageCreated {
        message: ChatMessage,
    },
    #[serde(rename_all = "camelCase")]
    ReactionsUpdated {
        group_id: String,
        message_id: String,
        reactions: Vec<Reaction>,
    },
}

enum Command {
    Join(String),
    Leave(String),
    Close,
}

enum Exit {
    Closed,
    ConnectionLost,
}

/// Handle to the one process-wide realtime connection. Joining and leaving
/// groups are logical subscriptions multiplexed over this single socket,
/// never new connections. The handle is cheap to clone; dropping the last
/// clone shuts the driver task down.
#[derive(Clone)]
pub struct Realtime {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<RealtimeEvent>,
}

impl Realtime {
    /// Establish the socket and spawn the driver task that owns it.
    pub async fn connect(socket_url: &str, token: &str) -> Result<Self, ApiError> {
        let socket = open_socket(socket_url, token).await?;
        info!("realtime channel connected to {}", socket_url);

        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        tokio::spawn(drive(
            socket_url.to_string(),
            token.to_string(),
            socket,
            command_rx,
            events.clone(),
        ));

        Ok(Self { commands, events })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.events.subscribe()
    }

    pub fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }
}

impl RoomControl for Realtime {
    fn join_room(&self, room_id: &str) {
        let _ = self.commands.send(Command::Join(room_id.to_string()));
    }

    fn leave_room(&self, room_id: &str) {
        let _ = self.commands.send(Command::Leave(room_id.to_string()));
    }
}

async fn open_socket(socket_url: &str, token: &str) -> Result<Socket, ApiError> {
    let mut request = socket_url.into_client_request()?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ApiError::Validation("session token contains invalid characters".to_string()))?;
    request.headers_mut().insert("authorization", bearer);

    let (socket, _response) = connect_async(request).await?;
    Ok(socket)
}

async fn send_control(socket: &mut Socket, action: &str, room: &str) -> Result<(), ApiError> {
    let frame = serde_json::json!({ "action": action, "room": room }).to_string();
    socket.send(Message::Text(frame)).await?;
    Ok(())
}

async fn drive(
    socket_url: String,
    token: String,
    mut socket: Socket,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<RealtimeEvent>,
) {
    let mut rooms: HashSet<String> = HashSet::new();

    loop {
        match run(&mut socket, &mut commands, &mut rooms, &events).await {
            Exit::Closed => {
                let _ = socket.close(None).await;
                debug!("realtime channel closed");
                return;
            }
            Exit::ConnectionLost => {
                warn!("realtime channel lost, reconnecting");
                let _ = events.send(RealtimeEvent::Disconnected);
            }
        }

        // Fixed-delay reconnect; subscriptions are re-established and the
        // Connected event tells consumers to refetch history wholesale.
        socket = loop {
            tokio::time::sleep(RECONNECT_DELAY).await;
            match open_socket(&socket_url, &token).await {
                Ok(mut fresh) => {
                    let mut rejoined = true;
                    for room in &rooms {
                        if send_control(&mut fresh, "join", room).await.is_err() {
                            rejoined = false;
                            break;
                        }
                    }
                    if rejoined {
                        break fresh;
                    }
                }
                Err(e) => debug!("reconnect attempt failed: {}", e),
            }
        };

        info!("realtime channel reconnected");
        let _ = events.send(RealtimeEvent::Connected);
    }
}

async fn run(
    socket: &mut Socket,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    rooms: &mut HashSet<String>,
    events: &broadcast::Sender<RealtimeEvent>,
) -> Exit {
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Join(room)) => {
                    rooms.insert(room.clone());
                    if send_control(socket, "join", &room).await.is_err() {
                        return Exit::ConnectionLost;
                    }
                }
                Some(Command::Leave(room)) => {
                    rooms.remove(&room);
                    if send_control(socket, "leave", &room).await.is_err() {
                        return Exit::ConnectionLost;
                    }
                }
                Some(Command::Close) | None => return Exit::Closed,
            },
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_frame(&text, events),
                Some(Ok(Message::Ping(data))) => {
                    if socket.send(Message::Pong(data)).await.is_err() {
                        return Exit::ConnectionLost;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Exit::ConnectionLost,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("socket read failed: {}", e);
                    return Exit::ConnectionLost;
                }
            },
        }
    }
}

fn handle_frame(text: &str, events: &broadcast::Sender<RealtimeEvent>) {
    match serde_json::from_str::<WireEvent>(text) {
        Ok(WireEvent::MessageCreated { message }) => {
            let _ = events.send(RealtimeEvent::MessageCreated(message));
        }
        Ok(WireEvent::ReactionsUpdated {
            group_id,
            message_id,
            reactions,
        }) => {
            let _ = events.send(RealtimeEvent::ReactionsUpdated {
                group_id,
                message_id,
                reactions,
            });
        }
        Err(e) => debug!("dropping unhandled frame: {}", e),
    }
}
