//! REST API route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::{preview, snippets};
use crate::web::state::WebAppState;

/// Build the API router with all REST endpoints.
pub fn api_routes() -> Router<WebAppState> {
    Router::new()
        // Snippet routes
        .route(
            "/snippets",
            get(snippets::list_snippets).post(snippets::create_snippet),
        )
        .route(
            "/snippets/{id}",
            get(snippets::get_snippet)
                .put(snippets::update_snippet)
                .delete(snippets::delete_snippet),
        )
        .route("/snippets/{id}/fork", post(snippets::fork_snippet))
        // Stateless preview
        .route("/compose", post(preview::compose_preview))
}

/// Standalone preview documents, outside `/api`.
pub fn preview_routes() -> Router<WebAppState> {
    Router::new()
        .route("/preview/{id}", get(preview::serve_preview))
        .route("/preview/{id}/thumb", get(preview::serve_thumbnail))
}
