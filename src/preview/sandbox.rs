//! The isolation boundary a composed document runs behind.
//!
//! A [`Sandbox`] is an immutable value: one identity, one document. Editing
//! never patches a live sandbox; the host discards it and loads a new one,
//! which drops every timer, listener and global the previous script left
//! behind.

use std::fmt;

use base64::engine::general_purpose;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bundle::SourceBundle;
use super::composer::{compose_tagged, ComposedDocument};

/// Frame sandbox tokens. Scripts may run, but without `allow-same-origin`
/// the frame gets an opaque origin: no cookies, no storage, no access to the
/// host DOM. Top-level navigation, popups and forms stay blocked.
pub const SANDBOX_FLAGS: &str = "allow-scripts";

/// CSP equivalent of [`SANDBOX_FLAGS`] for documents served over HTTP.
pub const CSP_HEADER_VALUE: &str = "sandbox allow-scripts";

const DATA_URI_PREFIX: &str = "data:text/html;charset=utf-8;base64,";

/// Identity of one loaded sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SandboxId(Uuid);

impl SandboxId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SandboxId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SandboxId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SandboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A composed document bound to a fresh sandbox identity.
#[derive(Debug, Clone)]
pub struct Sandbox {
    id: SandboxId,
    document: ComposedDocument,
}

impl Sandbox {
    /// Compose `bundle` into a new sandbox with its own identity.
    pub fn load(bundle: &SourceBundle) -> Self {
        let id = SandboxId::new();
        let document = compose_tagged(bundle, &id);
        tracing::debug!(instance = %id, bytes = document.len(), "Loaded sandbox");
        Self { id, document }
    }

    pub fn id(&self) -> SandboxId {
        self.id
    }

    pub fn document(&self) -> &ComposedDocument {
        &self.document
    }

    /// `data:` URI the frame loads the document from.
    pub fn data_uri(&self) -> String {
        data_uri(&self.document)
    }
}

/// Encode a document as a `data:` URI.
pub fn data_uri(document: &ComposedDocument) -> String {
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + document.len() * 4 / 3 + 4);
    uri.push_str(DATA_URI_PREFIX);
    general_purpose::STANDARD.encode_string(document.as_str(), &mut uri);
    uri
}

/// Decode a URI produced by [`data_uri`]. Returns `None` for anything else.
pub fn decode_data_uri(uri: &str) -> Option<String> {
    let payload = uri.strip_prefix(DATA_URI_PREFIX)?;
    let bytes = general_purpose::STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}
