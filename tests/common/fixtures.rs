//! Fixtures for integration tests

use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;
use webpad::preview::{ConsoleEnvelope, LogKind};
use webpad::{Config, Database, SandboxId, WebpadCore};

/// A database file inside a temporary directory.
pub struct TestDb {
    pub dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("webpad.db")
    }

    pub fn open(&self) -> Database {
        Database::open(self.path()).expect("Failed to open database")
    }

    /// A core on this database with default configuration.
    pub fn core(&self) -> WebpadCore {
        WebpadCore::new(Config::default(), self.open())
    }
}

/// The message the instrumentation script posts for one console call.
pub fn console_message(instance: Option<SandboxId>, kind: LogKind, message: &str) -> Value {
    serde_json::to_value(ConsoleEnvelope::new(instance, kind, message))
        .expect("Failed to serialize envelope")
}
