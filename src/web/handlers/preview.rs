//! Preview documents over plain HTTP.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::core::services::SnippetService;
use crate::preview::{
    compose, compose_static, ComposedDocument, Sandbox, SandboxId, SourceBundle, CSP_HEADER_VALUE,
    SANDBOX_FLAGS,
};
use crate::web::error::WebError;
use crate::web::state::WebAppState;

/// A freshly composed sandbox.
#[derive(Debug, Serialize)]
pub struct ComposeResponse {
    pub instance: SandboxId,
    /// `data:` URI for the preview frame.
    pub src: String,
    /// `sandbox` attribute the frame must carry.
    pub sandbox: &'static str,
}

/// Compose a bundle without opening a preview session.
pub async fn compose_preview(Json(bundle): Json<SourceBundle>) -> Json<ComposeResponse> {
    let sandbox = Sandbox::load(&bundle);
    Json(ComposeResponse {
        instance: sandbox.id(),
        src: sandbox.data_uri(),
        sandbox: SANDBOX_FLAGS,
    })
}

/// Serve a stored snippet as a standalone document.
pub async fn serve_preview(
    State(state): State<WebAppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let snippet = SnippetService::get(state.core(), id)?;
    Ok(sandboxed_document(compose(&snippet.bundle())))
}

/// Serve the script-free rendering of a stored snippet.
pub async fn serve_thumbnail(
    State(state): State<WebAppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let snippet = SnippetService::get(state.core(), id)?;
    Ok(sandboxed_document(compose_static(&snippet.bundle())))
}

/// The CSP header puts the document in an opaque origin even when it is
/// opened directly rather than through the preview frame.
fn sandboxed_document(document: ComposedDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CONTENT_SECURITY_POLICY, CSP_HEADER_VALUE),
        ],
        document.into_string(),
    )
        .into_response()
}
