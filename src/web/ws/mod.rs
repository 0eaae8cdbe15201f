//! Live preview over WebSocket.

mod handler;
mod messages;

pub use handler::{handle_client_message, handle_websocket, initial_messages};
pub use messages::{ClientMessage, LanguageOption, ServerMessage};
