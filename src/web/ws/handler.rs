//! WebSocket connection handler for live preview sessions.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::core::services::{SaveOutcome, SnippetService};
use crate::core::WebpadCore;
use crate::editor::{PreviewSession, Reload};
use crate::identity::Viewer;
use crate::preview::{RelayOutcome, SourceBundle};
use crate::web::state::WebAppState;

use super::messages::{ClientMessage, LanguageOption, ServerMessage};

/// Messages that bring a freshly connected page up to date.
pub fn initial_messages(session: &PreviewSession, viewer: &Viewer) -> Vec<ServerMessage> {
    let mut replies = vec![ServerMessage::Ready {
        session_id: session.id(),
        signed_in: viewer.is_signed_in(),
        languages: LanguageOption::all(),
    }];
    replies.extend(reload_messages(session.current()));
    replies.push(active_fragment(session));
    replies.push(ServerMessage::ConsoleVisibility {
        visible: session.relay().is_visible(),
    });
    replies
}

/// Apply one client message to `session` and return the replies, in order.
pub fn handle_client_message(
    core: &WebpadCore,
    viewer: &Viewer,
    session: &mut PreviewSession,
    msg: ClientMessage,
) -> Vec<ServerMessage> {
    match msg {
        ClientMessage::Ping => vec![ServerMessage::Pong],

        ClientMessage::Load { snippet_id } => match SnippetService::get(core, snippet_id) {
            Ok(snippet) => {
                let reload = session.load(snippet.bundle(), snippet.title, Some(snippet.id));
                let mut replies = reload_messages(reload);
                replies.push(active_fragment(session));
                replies
            }
            Err(e) => vec![ServerMessage::error(e.to_string())],
        },

        ClientMessage::SetActive { language } => {
            if session.set_active_by_id(&language) {
                vec![active_fragment(session)]
            } else {
                Vec::new()
            }
        }

        ClientMessage::SetFragment { language, value } => session
            .set_fragment_by_id(&language, value)
            .map(reload_messages)
            .unwrap_or_default(),

        ClientMessage::Clear => match session.clear() {
            Some(reload) => {
                let mut replies = reload_messages(reload);
                replies.push(active_fragment(session));
                replies
            }
            None => Vec::new(),
        },

        ClientMessage::Console { message } => match session.receive_console(&message) {
            RelayOutcome::Appended { entry, revealed } => {
                let Some(instance) = session.relay().current() else {
                    return Vec::new();
                };
                let mut replies = vec![ServerMessage::Log { instance, entry }];
                if revealed {
                    replies.push(ServerMessage::ConsoleVisibility { visible: true });
                }
                replies
            }
            RelayOutcome::Ignored | RelayOutcome::Stale { .. } => Vec::new(),
        },

        ClientMessage::ToggleConsole => vec![ServerMessage::ConsoleVisibility {
            visible: session.toggle_console(),
        }],

        ClientMessage::Save { title } => {
            match SnippetService::save_session(core, viewer, session, title.as_deref()) {
                Ok(outcome) => {
                    let created = matches!(outcome, SaveOutcome::Created(_));
                    let snippet = outcome.snippet();
                    vec![ServerMessage::Saved {
                        snippet_id: snippet.id,
                        title: snippet.title.clone(),
                        created,
                    }]
                }
                Err(e) => vec![ServerMessage::error(e.to_string())],
            }
        }
    }
}

fn reload_messages(reload: Reload) -> Vec<ServerMessage> {
    let instance = reload.instance;
    vec![
        ServerMessage::from(reload),
        ServerMessage::LogsCleared { instance },
    ]
}

fn active_fragment(session: &PreviewSession) -> ServerMessage {
    let editor = session.editor();
    ServerMessage::ActiveFragment {
        language: editor.active(),
        value: editor.active_fragment().to_string(),
    }
}

/// Handle a WebSocket connection.
pub async fn handle_websocket(socket: WebSocket, state: WebAppState, viewer: Viewer) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Channel for sending messages to the WebSocket
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(256);

    // Spawn task to forward messages to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(j) => j,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let core = state.core_handle();
    let session = PreviewSession::new(SourceBundle::starter(), core.config().relay_config());
    let session_id = session.id();
    let greeting = initial_messages(&session, &viewer);
    let session = state.sessions().open(session);

    'ws_loop: {
        for msg in greeting {
            if tx.send(msg).await.is_err() {
                break 'ws_loop;
            }
        }

        while let Some(result) = ws_receiver.next().await {
            let msg = match result {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            let replies = match serde_json::from_str::<ClientMessage>(&msg) {
                Ok(client_msg) => {
                    let mut session = session.lock();
                    handle_client_message(&core, &viewer, &mut session, client_msg)
                }
                Err(e) => vec![ServerMessage::error(format!("Invalid message: {}", e))],
            };

            for reply in replies {
                if let Err(send_err) = tx.send(reply).await {
                    tracing::debug!(%session_id, error = ?send_err, "Failed to send reply");
                    break 'ws_loop;
                }
            }
        }
    }

    if session.lock().is_dirty() {
        tracing::info!(%session_id, "Closing preview session with unsaved edits");
    }
    state.sessions().close(session_id);
    send_task.abort();
}
