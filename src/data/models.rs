//! Data models for stored snippets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::preview::SourceBundle;

/// Title used when a snippet has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Blank titles fall back to [`DEFAULT_TITLE`].
pub fn normalize_title(title: String) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// A saved playground snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique identifier
    pub id: Uuid,
    /// Identity-provider id of the author
    pub owner_id: String,
    pub title: String,
    pub html: String,
    pub css: String,
    pub js: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Snippet {
    /// Create a new snippet owned by `owner_id`
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>, bundle: SourceBundle) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title: normalize_title(title.into()),
            html: bundle.markup,
            css: bundle.style,
            js: bundle.script,
            created_at: now,
            updated_at: now,
        }
    }

    /// The three fragments, ready to seed an editor
    pub fn bundle(&self) -> SourceBundle {
        SourceBundle::new(self.html.clone(), self.css.clone(), self.js.clone())
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    pub fn summary(&self) -> SnippetSummary {
        SnippetSummary {
            id: self.id,
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing row without fragment text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnippetSummary {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snippet_defaults_blank_title() {
        let snippet = Snippet::new("user_1", "   ", SourceBundle::starter());
        assert_eq!(snippet.title, "Untitled");
        assert_eq!(snippet.created_at, snippet.updated_at);
        assert_eq!(snippet.bundle(), SourceBundle::starter());
    }

    #[test]
    fn test_normalize_title_trims() {
        assert_eq!(normalize_title("  Demo \n".to_string()), "Demo");
        assert_eq!(normalize_title("\t".to_string()), DEFAULT_TITLE);
    }

    #[test]
    fn test_ownership() {
        let snippet = Snippet::new("user_1", "Demo", SourceBundle::default());
        assert!(snippet.is_owned_by("user_1"));
        assert!(!snippet.is_owned_by("user_2"));
    }
}
