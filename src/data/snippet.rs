//! Snippet data access object

use super::models::{normalize_title, Snippet, SnippetSummary};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Snippet {0} not found")]
    NotFound(Uuid),
    #[error("Snippet {0} belongs to another user")]
    Forbidden(Uuid),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct SnippetChanges {
    pub title: Option<String>,
    pub html: Option<String>,
    pub css: Option<String>,
    pub js: Option<String>,
}

const COLUMNS: &str = "id, owner_id, title, html, css, js, created_at, updated_at";

/// Data access object for Snippet operations
#[derive(Clone)]
pub struct SnippetStore {
    conn: Arc<Mutex<Connection>>,
}

impl SnippetStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert a new snippet
    pub fn create(&self, snippet: &Snippet) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO snippets (id, owner_id, title, html, css, js, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                snippet.id.to_string(),
                snippet.owner_id,
                snippet.title,
                snippet.html,
                snippet.css,
                snippet.js,
                timestamp(&snippet.created_at),
                timestamp(&snippet.updated_at),
            ],
        )?;
        tracing::info!(snippet_id = %snippet.id, owner_id = %snippet.owner_id, "Created snippet");
        Ok(())
    }

    /// Get a snippet by ID
    pub fn get(&self, id: Uuid) -> StoreResult<Option<Snippet>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM snippets WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_snippet(row)?)),
            None => Ok(None),
        }
    }

    /// Apply `changes` to a snippet owned by `owner_id`
    pub fn update(&self, id: Uuid, owner_id: &str, changes: SnippetChanges) -> StoreResult<Snippet> {
        let mut snippet = self.get(id)?.ok_or(StoreError::NotFound(id))?;
        if !snippet.is_owned_by(owner_id) {
            return Err(StoreError::Forbidden(id));
        }

        if let Some(title) = changes.title {
            snippet.title = normalize_title(title);
        }
        if let Some(html) = changes.html {
            snippet.html = html;
        }
        if let Some(css) = changes.css {
            snippet.css = css;
        }
        if let Some(js) = changes.js {
            snippet.js = js;
        }
        snippet.updated_at = Utc::now();

        self.write(&snippet, owner_id)?;
        tracing::info!(snippet_id = %id, "Updated snippet");
        Ok(snippet)
    }

    /// Persist an already-checked update. The row may have been deleted
    /// since it was read, so no match is `NotFound`.
    fn write(&self, snippet: &Snippet, owner_id: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "UPDATE snippets SET title = ?2, html = ?3, css = ?4, js = ?5, updated_at = ?6
             WHERE id = ?1 AND owner_id = ?7",
            params![
                snippet.id.to_string(),
                snippet.title,
                snippet.html,
                snippet.css,
                snippet.js,
                timestamp(&snippet.updated_at),
                owner_id,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(snippet.id));
        }
        Ok(())
    }

    /// Delete a snippet owned by `owner_id`
    pub fn delete(&self, id: Uuid, owner_id: &str) -> StoreResult<()> {
        let snippet = self.get(id)?.ok_or(StoreError::NotFound(id))?;
        if !snippet.is_owned_by(owner_id) {
            return Err(StoreError::Forbidden(id));
        }

        self.remove(id, owner_id)?;
        tracing::info!(snippet_id = %id, "Deleted snippet");
        Ok(())
    }

    fn remove(&self, id: Uuid, owner_id: &str) -> StoreResult<()> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "DELETE FROM snippets WHERE id = ?1 AND owner_id = ?2",
            params![id.to_string(), owner_id],
        )?;
        if rows == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// All snippets of one owner, newest first
    pub fn list_by_owner(&self, owner_id: &str) -> StoreResult<Vec<SnippetSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM snippets WHERE owner_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let snippets = stmt
            .query_map(params![owner_id], Self::row_to_snippet)?
            .map(|row| row.map(|s| s.summary()))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(snippets)
    }

    /// Owner's snippets whose title contains `query`, ignoring ASCII case
    pub fn search_by_owner(&self, owner_id: &str, query: &str) -> StoreResult<Vec<SnippetSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_by_owner(owner_id);
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM snippets
             WHERE owner_id = ?1 AND title LIKE '%' || ?2 || '%' ESCAPE '\\'
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let snippets = stmt
            .query_map(params![owner_id, escape_like(query)], Self::row_to_snippet)?
            .map(|row| row.map(|s| s.summary()))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(snippets)
    }

    /// Convert a database row to a Snippet
    fn row_to_snippet(row: &rusqlite::Row) -> rusqlite::Result<Snippet> {
        let id_str: String = row.get(0)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        Ok(Snippet {
            id: Uuid::parse_str(&id_str).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
            })?,
            owner_id: row.get(1)?,
            title: row.get(2)?,
            html: row.get(3)?,
            css: row.get(4)?,
            js: row.get(5)?,
            created_at: parse_timestamp(&created_at_str),
            updated_at: parse_timestamp(&updated_at_str),
        })
    }
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
