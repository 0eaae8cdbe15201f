use uuid::Uuid;

use crate::core::services::error::ServiceError;
use crate::core::WebpadCore;
use crate::data::{Snippet, SnippetChanges, SnippetSummary};
use crate::editor::PreviewSession;
use crate::identity::Viewer;
use crate::preview::SourceBundle;

/// Result of saving an editor session.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The viewer's own snippet was updated in place.
    Updated(Snippet),
    /// A new snippet was created: either a first save, or a copy of
    /// somebody else's snippet.
    Created(Snippet),
}

impl SaveOutcome {
    pub fn snippet(&self) -> &Snippet {
        match self {
            SaveOutcome::Updated(snippet) | SaveOutcome::Created(snippet) => snippet,
        }
    }
}

pub struct SnippetService;

impl SnippetService {
    fn require_user(viewer: &Viewer) -> Result<&str, ServiceError> {
        viewer.user_id().ok_or(ServiceError::Unauthorized)
    }

    /// The viewer's snippets, newest first, optionally filtered by title.
    pub fn list(
        core: &WebpadCore,
        viewer: &Viewer,
        query: Option<&str>,
    ) -> Result<Vec<SnippetSummary>, ServiceError> {
        let owner = Self::require_user(viewer)?;
        let store = core.snippet_store();
        let snippets = match query {
            Some(query) => store.search_by_owner(owner, query)?,
            None => store.list_by_owner(owner)?,
        };
        Ok(snippets)
    }

    /// Snippets are readable by anyone who has the id.
    pub fn get(core: &WebpadCore, id: Uuid) -> Result<Snippet, ServiceError> {
        core.snippet_store()
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Snippet {} not found", id)))
    }

    pub fn create(
        core: &WebpadCore,
        viewer: &Viewer,
        title: impl Into<String>,
        bundle: SourceBundle,
    ) -> Result<Snippet, ServiceError> {
        let owner = Self::require_user(viewer)?;
        let snippet = Snippet::new(owner, title, bundle);
        core.snippet_store().create(&snippet)?;
        Ok(snippet)
    }

    pub fn update(
        core: &WebpadCore,
        viewer: &Viewer,
        id: Uuid,
        changes: SnippetChanges,
    ) -> Result<Snippet, ServiceError> {
        let owner = Self::require_user(viewer)?;
        Ok(core.snippet_store().update(id, owner, changes)?)
    }

    pub fn delete(core: &WebpadCore, viewer: &Viewer, id: Uuid) -> Result<(), ServiceError> {
        let owner = Self::require_user(viewer)?;
        Ok(core.snippet_store().delete(id, owner)?)
    }

    /// Save a copy of any snippet under the viewer's account.
    pub fn fork(
        core: &WebpadCore,
        viewer: &Viewer,
        id: Uuid,
        title: &str,
    ) -> Result<Snippet, ServiceError> {
        Self::require_user(viewer)?;
        let title = Self::require_title(Some(title))?;
        let source = Self::get(core, id)?;
        let copy = Self::create(core, viewer, title, source.bundle())?;
        tracing::info!(source = %id, copy = %copy.id, "Forked snippet");
        Ok(copy)
    }

    /// Persist the session's current fragments.
    ///
    /// Owners update their snippet in place. Anyone else gets a new snippet,
    /// which needs an explicit `title` when the session was opened from
    /// somebody else's snippet.
    pub fn save_session(
        core: &WebpadCore,
        viewer: &Viewer,
        session: &mut PreviewSession,
        title: Option<&str>,
    ) -> Result<SaveOutcome, ServiceError> {
        Self::require_user(viewer)?;
        let bundle = session.editor().bundle().clone();

        let existing = match session.snippet_id() {
            Some(id) => core.snippet_store().get(id)?,
            None => None,
        };

        let outcome = match existing {
            Some(snippet) if viewer.can_mutate(&snippet) => {
                let changes = SnippetChanges {
                    title: Some(title.unwrap_or(session.title()).to_string()),
                    html: Some(bundle.markup),
                    css: Some(bundle.style),
                    js: Some(bundle.script),
                };
                SaveOutcome::Updated(Self::update(core, viewer, snippet.id, changes)?)
            }
            Some(_) => {
                let title = Self::require_title(title)?;
                SaveOutcome::Created(Self::create(core, viewer, title, bundle)?)
            }
            None => {
                let title = title.unwrap_or(session.title()).to_string();
                SaveOutcome::Created(Self::create(core, viewer, title, bundle)?)
            }
        };

        let saved = outcome.snippet();
        session.mark_saved(saved.id, saved.title.clone());
        Ok(outcome)
    }

    fn require_title(title: Option<&str>) -> Result<String, ServiceError> {
        match title.map(str::trim) {
            Some(title) if !title.is_empty() => Ok(title.to_string()),
            _ => Err(ServiceError::InvalidInput(
                "Please enter a title for your snippet".to_string(),
            )),
        }
    }
}
