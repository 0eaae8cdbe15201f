//! Shared state for the web server.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::core::WebpadCore;
use crate::editor::SessionRegistry;
use crate::identity::Viewer;

/// State handed to every handler.
#[derive(Clone)]
pub struct WebAppState {
    core: Arc<WebpadCore>,
    sessions: SessionRegistry,
}

impl WebAppState {
    pub fn new(core: WebpadCore) -> Self {
        Self {
            core: Arc::new(core),
            sessions: SessionRegistry::new(),
        }
    }

    pub fn core(&self) -> &WebpadCore {
        &self.core
    }

    /// Shared handle for tasks that outlive a request.
    pub fn core_handle(&self) -> Arc<WebpadCore> {
        self.core.clone()
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}

/// Handlers take a [`Viewer`] argument to learn who is asking.
impl FromRequestParts<WebAppState> for Viewer {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &WebAppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.core().identity().current_viewer(&parts.headers))
    }
}
