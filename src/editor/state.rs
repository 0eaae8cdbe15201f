//! Editable fragment state with change notification.

use std::fmt;

use crate::preview::{FragmentKind, SourceBundle};

/// Handle returned by [`EditorState::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(&SourceBundle) + Send>;

/// The three fragments being edited and which one has focus.
///
/// Observers run after every mutation that changes fragment text, with the
/// bundle as it stands after the change. Switching the active language is
/// not a content change and notifies nobody.
pub struct EditorState {
    bundle: SourceBundle,
    active: FragmentKind,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl EditorState {
    pub fn new(bundle: SourceBundle) -> Self {
        Self {
            bundle,
            active: FragmentKind::Markup,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn bundle(&self) -> &SourceBundle {
        &self.bundle
    }

    pub fn active(&self) -> FragmentKind {
        self.active
    }

    /// Text of the fragment that currently receives edits.
    pub fn active_fragment(&self) -> &str {
        self.bundle.get(self.active)
    }

    pub fn set_active(&mut self, kind: FragmentKind) {
        self.active = kind;
    }

    /// Select the active fragment by wire id. Unknown ids are ignored.
    pub fn set_active_by_id(&mut self, id: &str) -> bool {
        match id.parse::<FragmentKind>() {
            Ok(kind) => {
                self.active = kind;
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring active fragment switch");
                false
            }
        }
    }

    /// Replace one fragment. Returns `true` when the text changed.
    pub fn set_fragment(&mut self, kind: FragmentKind, value: impl Into<String>) -> bool {
        let changed = self.bundle.set(kind, value);
        if changed {
            self.notify();
        }
        changed
    }

    /// Replace a fragment named by wire id.
    ///
    /// An unrecognized id is a silent no-op, same as the editor UI has always
    /// behaved.
    pub fn set_fragment_by_id(&mut self, id: &str, value: impl Into<String>) -> bool {
        match id.parse::<FragmentKind>() {
            Ok(kind) => self.set_fragment(kind, value),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring fragment edit");
                false
            }
        }
    }

    /// Replace the active fragment.
    pub fn edit_active(&mut self, value: impl Into<String>) -> bool {
        self.set_fragment(self.active, value)
    }

    /// Swap in a whole bundle, e.g. after loading a snippet.
    pub fn replace_bundle(&mut self, bundle: SourceBundle) -> bool {
        if self.bundle == bundle {
            return false;
        }
        self.bundle = bundle;
        self.notify();
        true
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SourceBundle) + Send + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.bundle);
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(SourceBundle::default())
    }
}

impl fmt::Debug for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorState")
            .field("bundle", &self.bundle)
            .field("active", &self.active)
            .field("observers", &self.observers.len())
            .finish()
    }
}
