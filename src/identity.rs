//! Viewer identity.
//!
//! Sign-in is handled by an external identity provider sitting in front of
//! the server. All webpad needs is who is asking and whether they may change
//! a given snippet.

use axum::http::HeaderMap;
use serde::Serialize;

use crate::data::Snippet;

/// Header the upstream auth proxy sets by default.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-webpad-user";

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Viewer {
    Anonymous,
    User(String),
}

impl Viewer {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(id),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Viewer::User(_))
    }

    /// Only the owner may update or delete a snippet.
    pub fn can_mutate(&self, snippet: &Snippet) -> bool {
        self.user_id()
            .is_some_and(|id| snippet.is_owned_by(id))
    }
}

/// Resolves the viewer for an incoming request.
pub trait IdentityProvider: Send + Sync {
    fn current_viewer(&self, headers: &HeaderMap) -> Viewer;
}

/// Trusts a user id header injected by an authenticating reverse proxy.
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: String,
}

impl HeaderIdentity {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into().to_ascii_lowercase(),
        }
    }
}

impl Default for HeaderIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_HEADER)
    }
}

impl IdentityProvider for HeaderIdentity {
    fn current_viewer(&self, headers: &HeaderMap) -> Viewer {
        headers
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Viewer::User(id.to_string()))
            .unwrap_or(Viewer::Anonymous)
    }
}
