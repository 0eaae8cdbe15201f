//! Core infrastructure shared between the REST API and the preview socket.

use std::sync::Arc;

use crate::config::Config;
use crate::data::{Database, DatabaseError, SnippetStore};
use crate::identity::{HeaderIdentity, IdentityProvider};

/// Owns the configuration, the database and everything built on top of it.
pub struct WebpadCore {
    /// Application configuration
    config: Config,
    /// Database connection (owned to keep connection alive)
    _database: Database,
    /// Snippet DAO
    snippet_store: SnippetStore,
    /// Resolves the viewer of each request
    identity: Arc<dyn IdentityProvider>,
}

impl WebpadCore {
    /// Build a core on an already opened database.
    pub fn new(config: Config, database: Database) -> Self {
        let identity = Arc::new(HeaderIdentity::new(config.identity.header.clone()));
        Self::with_identity(config, database, identity)
    }

    /// Build a core with a custom identity provider.
    pub fn with_identity(
        config: Config,
        database: Database,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let snippet_store = SnippetStore::new(database.connection());
        Self {
            config,
            _database: database,
            snippet_store,
            identity,
        }
    }

    /// Open the database in the data directory and build a core on it.
    pub fn open_default(config: Config) -> Result<Self, DatabaseError> {
        let database = Database::open_default()?;
        tracing::info!(path = %database.path.display(), "Database ready");
        Ok(Self::new(config, database))
    }

    /// Get the application configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the snippet store.
    pub fn snippet_store(&self) -> &SnippetStore {
        &self.snippet_store
    }

    /// Get the identity provider.
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }
}

impl std::fmt::Debug for WebpadCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebpadCore")
            .field("config", &self.config)
            .field("database", &self._database)
            .finish()
    }
}
