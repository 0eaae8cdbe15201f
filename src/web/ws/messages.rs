//! Preview session protocol.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::Reload;
use crate::preview::{FragmentKind, LogEntry, SandboxId};

/// Messages from the host page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    /// Open a stored snippet in the editor.
    Load { snippet_id: Uuid },
    /// Switch the language selector. Unknown ids are ignored.
    SetActive { language: String },
    /// Replace one fragment. Unknown ids are ignored.
    SetFragment { language: String, value: String },
    /// Reset to the starter fragments.
    Clear,
    /// A `message` event from the preview frame, forwarded untouched.
    Console { message: serde_json::Value },
    ToggleConsole,
    /// Save the current fragments. `title` is required when saving a copy
    /// of somebody else's snippet.
    Save {
        #[serde(default)]
        title: Option<String>,
    },
}

/// One entry of the host page's language selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub id: FragmentKind,
    pub label: &'static str,
}

impl LanguageOption {
    pub fn all() -> Vec<LanguageOption> {
        FragmentKind::ALL
            .into_iter()
            .map(|kind| LanguageOption {
                id: kind,
                label: kind.label(),
            })
            .collect()
    }
}

/// Messages to the host page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Pong,
    /// Sent once after connecting.
    Ready {
        session_id: Uuid,
        /// Saving needs a signed-in viewer.
        signed_in: bool,
        languages: Vec<LanguageOption>,
    },
    /// Swap the preview frame for a new sandbox. The host must apply
    /// `sandbox` as the frame's `sandbox` attribute.
    Reload {
        instance: SandboxId,
        src: String,
        sandbox: &'static str,
        dirty: bool,
    },
    /// Text the editor should show for the selected language.
    ActiveFragment { language: FragmentKind, value: String },
    Log { instance: SandboxId, entry: LogEntry },
    LogsCleared { instance: SandboxId },
    ConsoleVisibility { visible: bool },
    Saved {
        snippet_id: Uuid,
        title: String,
        /// A new snippet was created rather than an existing one updated.
        created: bool,
    },
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}

impl From<Reload> for ServerMessage {
    fn from(reload: Reload) -> Self {
        ServerMessage::Reload {
            instance: reload.instance,
            src: reload.src,
            sandbox: reload.sandbox,
            dirty: reload.dirty,
        }
    }
}
