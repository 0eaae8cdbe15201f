//! Snippet handlers for the webpad API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::services::SnippetService;
use crate::data::{Snippet, SnippetChanges, SnippetSummary};
use crate::identity::Viewer;
use crate::preview::SourceBundle;
use crate::web::error::WebError;
use crate::web::state::WebAppState;

/// Response for a single snippet.
#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub html: String,
    pub css: String,
    pub js: String,
    /// Whether the viewer may update or delete this snippet.
    pub is_owner: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl SnippetResponse {
    fn for_viewer(snippet: Snippet, viewer: &Viewer) -> Self {
        let is_owner = viewer.can_mutate(&snippet);
        Self {
            id: snippet.id,
            owner_id: snippet.owner_id,
            title: snippet.title,
            html: snippet.html,
            css: snippet.css,
            js: snippet.js,
            is_owner,
            created_at: snippet.created_at.to_rfc3339(),
            updated_at: snippet.updated_at.to_rfc3339(),
        }
    }
}

/// One row of the snippet list.
#[derive(Debug, Serialize)]
pub struct SnippetSummaryResponse {
    pub id: Uuid,
    pub title: String,
    /// Script-free rendering for list thumbnails.
    pub thumbnail_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SnippetSummary> for SnippetSummaryResponse {
    fn from(summary: SnippetSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            thumbnail_url: format!("/preview/{}/thumb", summary.id),
            created_at: summary.created_at.to_rfc3339(),
            updated_at: summary.updated_at.to_rfc3339(),
        }
    }
}

/// Response for listing snippets.
#[derive(Debug, Serialize)]
pub struct ListSnippetsResponse {
    pub snippets: Vec<SnippetSummaryResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSnippetsQuery {
    /// Case-insensitive title filter.
    pub q: Option<String>,
}

/// Request to create a new snippet.
#[derive(Debug, Deserialize)]
pub struct CreateSnippetRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub js: String,
}

/// Request to update a snippet. Missing fields are left alone.
#[derive(Debug, Deserialize)]
pub struct UpdateSnippetRequest {
    pub title: Option<String>,
    pub html: Option<String>,
    pub css: Option<String>,
    pub js: Option<String>,
}

/// Request to save a copy of a snippet.
#[derive(Debug, Deserialize)]
pub struct ForkSnippetRequest {
    #[serde(default)]
    pub title: String,
}

/// List the viewer's snippets, newest first.
pub async fn list_snippets(
    State(state): State<WebAppState>,
    viewer: Viewer,
    Query(query): Query<ListSnippetsQuery>,
) -> Result<Json<ListSnippetsResponse>, WebError> {
    let snippets = SnippetService::list(state.core(), &viewer, query.q.as_deref())?;

    Ok(Json(ListSnippetsResponse {
        snippets: snippets.into_iter().map(SnippetSummaryResponse::from).collect(),
    }))
}

/// Get a single snippet by ID. Readable without signing in.
pub async fn get_snippet(
    State(state): State<WebAppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<Json<SnippetResponse>, WebError> {
    let snippet = SnippetService::get(state.core(), id)?;
    Ok(Json(SnippetResponse::for_viewer(snippet, &viewer)))
}

/// Create a new snippet owned by the viewer.
pub async fn create_snippet(
    State(state): State<WebAppState>,
    viewer: Viewer,
    Json(req): Json<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<SnippetResponse>), WebError> {
    let bundle = SourceBundle::new(req.html, req.css, req.js);
    let snippet = SnippetService::create(state.core(), &viewer, req.title, bundle)?;

    Ok((
        StatusCode::CREATED,
        Json(SnippetResponse::for_viewer(snippet, &viewer)),
    ))
}

/// Update a snippet owned by the viewer.
pub async fn update_snippet(
    State(state): State<WebAppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSnippetRequest>,
) -> Result<Json<SnippetResponse>, WebError> {
    let changes = SnippetChanges {
        title: req.title,
        html: req.html,
        css: req.css,
        js: req.js,
    };
    let snippet = SnippetService::update(state.core(), &viewer, id, changes)?;
    Ok(Json(SnippetResponse::for_viewer(snippet, &viewer)))
}

/// Delete a snippet owned by the viewer.
pub async fn delete_snippet(
    State(state): State<WebAppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    SnippetService::delete(state.core(), &viewer, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Save somebody's snippet as a new snippet of the viewer.
pub async fn fork_snippet(
    State(state): State<WebAppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
    Json(req): Json<ForkSnippetRequest>,
) -> Result<(StatusCode, Json<SnippetResponse>), WebError> {
    let snippet = SnippetService::fork(state.core(), &viewer, id, &req.title)?;

    Ok((
        StatusCode::CREATED,
        Json(SnippetResponse::for_viewer(snippet, &viewer)),
    ))
}
