//! One author's live preview: editor state, current sandbox, console relay.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use super::state::EditorState;
use crate::data::{normalize_title, DEFAULT_TITLE};
use crate::preview::{
    ConsoleRelay, FragmentKind, RelayConfig, RelayOutcome, Sandbox, SandboxId, SourceBundle,
    SANDBOX_FLAGS,
};

/// Instruction for the host page to swap its preview frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reload {
    pub instance: SandboxId,
    pub src: String,
    /// `sandbox` attribute tokens for the new frame.
    pub sandbox: &'static str,
    /// Unsaved edits after this reload.
    pub dirty: bool,
}

/// Couples the editor to the preview.
///
/// The session subscribes to its own [`EditorState`]; every content change
/// lands in a pending slot, and draining that slot recomposes the document
/// into a brand-new sandbox and empties the console before the new sandbox
/// can emit anything. Messages still in flight from the previous sandbox are
/// then rejected by the relay as stale.
#[derive(Debug)]
pub struct PreviewSession {
    id: Uuid,
    editor: EditorState,
    pending: Arc<Mutex<Option<SourceBundle>>>,
    sandbox: Sandbox,
    relay: ConsoleRelay,
    title: String,
    snippet_id: Option<Uuid>,
    dirty: bool,
}

impl PreviewSession {
    pub fn new(bundle: SourceBundle, relay_config: RelayConfig) -> Self {
        let sandbox = Sandbox::load(&bundle);
        let mut relay = ConsoleRelay::new(relay_config);
        relay.reset(sandbox.id());

        let mut editor = EditorState::new(bundle);
        let pending = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&pending);
        editor.subscribe(move |bundle: &SourceBundle| {
            *slot.lock() = Some(bundle.clone());
        });

        Self {
            id: Uuid::new_v4(),
            editor,
            pending,
            sandbox,
            relay,
            title: DEFAULT_TITLE.to_string(),
            snippet_id: None,
            dirty: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorState {
        &mut self.editor
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn relay(&self) -> &ConsoleRelay {
        &self.relay
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Snippet this session was loaded from or last saved as.
    pub fn snippet_id(&self) -> Option<Uuid> {
        self.snippet_id
    }

    /// Unsaved edits since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The frame the host should currently show.
    pub fn current(&self) -> Reload {
        Reload {
            instance: self.sandbox.id(),
            src: self.sandbox.data_uri(),
            sandbox: SANDBOX_FLAGS,
            dirty: self.dirty,
        }
    }

    pub fn set_active(&mut self, kind: FragmentKind) {
        self.editor.set_active(kind);
    }

    pub fn set_active_by_id(&mut self, id: &str) -> bool {
        self.editor.set_active_by_id(id)
    }

    pub fn set_fragment(&mut self, kind: FragmentKind, value: impl Into<String>) -> Option<Reload> {
        self.editor.set_fragment(kind, value);
        self.flush_edits()
    }

    /// Unknown ids change nothing and trigger no reload.
    pub fn set_fragment_by_id(&mut self, id: &str, value: impl Into<String>) -> Option<Reload> {
        self.editor.set_fragment_by_id(id, value);
        self.flush_edits()
    }

    pub fn edit_active(&mut self, value: impl Into<String>) -> Option<Reload> {
        self.editor.edit_active(value);
        self.flush_edits()
    }

    /// Reset every fragment to the starter content.
    pub fn clear(&mut self) -> Option<Reload> {
        self.editor.replace_bundle(SourceBundle::starter());
        self.flush_edits()
    }

    /// Reload if the editor reported a content change since the last reload,
    /// including changes made directly through [`Self::editor_mut`].
    pub fn flush_edits(&mut self) -> Option<Reload> {
        let bundle = self.pending.lock().take()?;
        self.dirty = true;
        Some(self.reload(&bundle))
    }

    /// Load a stored snippet. Always reloads, even if the text is unchanged.
    pub fn load(&mut self, bundle: SourceBundle, title: impl Into<String>, snippet_id: Option<Uuid>) -> Reload {
        self.editor.replace_bundle(bundle);
        let pending = self.pending.lock().take();
        let bundle = pending.unwrap_or_else(|| self.editor.bundle().clone());
        self.title = normalize_title(title.into());
        self.snippet_id = snippet_id;
        self.dirty = false;
        self.reload(&bundle)
    }

    pub fn mark_saved(&mut self, snippet_id: Uuid, title: impl Into<String>) {
        self.snippet_id = Some(snippet_id);
        self.title = normalize_title(title.into());
        self.dirty = false;
    }

    /// Feed one raw message forwarded from the preview frame.
    pub fn receive_console(&mut self, raw: &serde_json::Value) -> RelayOutcome {
        self.relay.on_message(raw)
    }

    pub fn toggle_console(&mut self) -> bool {
        self.relay.toggle_visibility()
    }

    fn reload(&mut self, bundle: &SourceBundle) -> Reload {
        let previous = self.sandbox.id();
        self.sandbox = Sandbox::load(bundle);
        self.relay.reset(self.sandbox.id());
        tracing::debug!(
            session_id = %self.id,
            %previous,
            instance = %self.sandbox.id(),
            "Preview reloaded"
        );
        self.current()
    }
}

/// Live sessions keyed by id, one per connected editor.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<PreviewSession>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its shared handle.
    pub fn open(&self, session: PreviewSession) -> Arc<Mutex<PreviewSession>> {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().insert(id, handle.clone());
        tracing::info!(session_id = %id, "Preview session opened");
        handle
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Mutex<PreviewSession>>> {
        self.sessions.read().get(&id).cloned()
    }

    pub fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Preview session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
