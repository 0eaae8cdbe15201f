pub mod config;
pub mod core;
pub mod data;
pub mod editor;
pub mod identity;
pub mod preview;
pub mod util;
pub mod web;

pub use config::Config;
pub use crate::core::WebpadCore;
pub use data::{Database, Snippet, SnippetStore};
pub use editor::{EditorState, PreviewSession, SessionRegistry};
pub use identity::{HeaderIdentity, IdentityProvider, Viewer};
pub use preview::{compose, ComposedDocument, ConsoleRelay, Sandbox, SandboxId, SourceBundle};
