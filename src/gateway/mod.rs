pub mod connection;
pub mod dispatcher;
pub mod events;
pub mod registry;
pub mod session;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};

use crate::state::AppState;
use connection::{Connection, Outbound};
use session::Session;

pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| {
        let sessions = state.sessions.clone();
        sessions.track_future(handle_socket(socket, state))
    })
}

/// Drive one session for the lifetime of the socket. This task is the only
/// writer to the socket; everything else reaches the peer through the
/// connection's queue.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sink, mut ws_stream) = socket.split();
    let (connection, mut outbound) = Connection::open();
    let shutdown = state.shutdown.clone();
    let mut draining = false;

    let mut session = Session::new(
        connection.clone(),
        state.dispatcher.clone(),
        state.peer_publish,
    );
    session.on_connect();

    loop {
        tokio::select! {
            Some(item) = outbound.recv() => {
                match item {
                    Outbound::Frame(text) => {
                        if ws_sink.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Outbound::Close => {
                        let _ = ws_sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => session.on_message(&text),
                    Some(Ok(Message::Binary(_))) => session.on_binary(),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        session.on_error(&e);
                        break;
                    }
                    // ping/pong are answered by the transport
                    _ => {}
                }
            }
            // Queued behind anything already pending, so the peer gets those
            // frames before the close.
            _ = shutdown.cancelled(), if !draining => {
                draining = true;
                connection.close();
            }
        }
    }

    // Mark the connection closed before unbinding so a concurrent broadcast
    // that already resolved it sees it as closed.
    outbound.close();
    session.on_close();
}
