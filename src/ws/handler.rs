//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::WorldCommand;
use crate::util::rate_limit::SessionRateLimiter;
use crate::util::time::unix_millis;
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let player_id = Uuid::new_v4();
    info!(player_id = %player_id, "New WebSocket connection");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Send welcome message
    let welcome = ServerMsg::Welcome {
        player_id,
        server_time: unix_millis(),
    };
    if let Err(e) = send_msg(&mut ws_sink, &welcome).await {
        error!(player_id = %player_id, error = %e, "Failed to send welcome");
        return;
    }

    // Personal outbound channel; the world holds a sender once joined
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMsg>();

    // Writer task: world updates -> WebSocket
    let writer_player_id = player_id;
    let writer_handle = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                debug!(player_id = %writer_player_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    let rate_limiter = SessionRateLimiter::new();
    let cmd_tx = state.world.cmd_tx.clone();

    // Reader loop: WebSocket -> world
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMsg>(&text) {
                Ok(ClientMsg::Join { user }) => {
                    let cmd = WorldCommand::Join {
                        player_id,
                        user,
                        tx: out_tx.clone(),
                    };
                    if cmd_tx.send(cmd).is_err() {
                        debug!(player_id = %player_id, "World channel closed");
                        break;
                    }
                }
                Ok(ClientMsg::Input { direction }) => {
                    if !rate_limiter.check_input() {
                        warn!(player_id = %player_id, "Rate limited input message");
                        continue;
                    }
                    let cmd = WorldCommand::Input {
                        player_id,
                        direction,
                    };
                    if cmd_tx.send(cmd).is_err() {
                        debug!(player_id = %player_id, "World channel closed");
                        break;
                    }
                }
                Ok(ClientMsg::Ping { t }) => {
                    let _ = out_tx.send(ServerMsg::Pong { t });
                }
                Err(e) => {
                    warn!(player_id = %player_id, error = %e, "Failed to parse client message");
                }
            },
            Ok(Message::Binary(_)) => {
                warn!(player_id = %player_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!(player_id = %player_id, "Client initiated close");
                break;
            }
            Err(e) => {
                error!(player_id = %player_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Signal disconnect to the world; removal is immediate next tick
    let _ = cmd_tx.send(WorldCommand::Disconnect { player_id });

    writer_handle.abort();

    info!(player_id = %player_id, "WebSocket connection closed");
}

/// Send a message over WebSocket
async fn send_msg(
    sink: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> Result<(), String> {
    let json = serde_json::to_string(msg).map_err(|e| e.to_string())?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| e.to_string())
}
