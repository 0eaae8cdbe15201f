//! Data persistence layer for webpad
//!
//! This module provides SQLite-based storage for saved snippets.

mod database;
mod migrations;
mod models;
mod snippet;

pub use database::{Database, DatabaseError};
pub use models::{normalize_title, Snippet, SnippetSummary, DEFAULT_TITLE};
pub use snippet::{SnippetChanges, SnippetStore, StoreError, StoreResult};
