//! Editor state and the per-author preview session built on it.

mod session;
mod state;

pub use crate::data::{normalize_title, DEFAULT_TITLE};
pub use session::{PreviewSession, Reload, SessionRegistry};
pub use state::{EditorState, ObserverId};
