//! Host-side receiver for console traffic coming out of the sandbox.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::instrument::{parse_envelope, LogKind};
use super::sandbox::SandboxId;

/// Default bound on buffered entries per sandbox.
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 1000;

/// One captured console call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Entries for the current sandbox, in arrival order.
///
/// The oldest entries are dropped first once `capacity` is reached, so a
/// script logging in a tight loop cannot grow the host without bound.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    dropped: usize,
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        self.entries.push_back(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries evicted by the capacity bound since the last clear.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }
}

/// Relay settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    pub max_entries: usize,
    /// Show the console panel when the first entry after a reset arrives.
    pub auto_reveal: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_LOG_ENTRIES,
            auto_reveal: true,
        }
    }
}

/// What happened to one incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Appended to the buffer. `revealed` is set when this entry flipped the
    /// console panel to visible.
    Appended { entry: LogEntry, revealed: bool },
    /// Not a console envelope.
    Ignored,
    /// A console envelope from a sandbox that is no longer current.
    Stale { instance: SandboxId },
}

/// Owns the log buffer and the console panel visibility flag.
///
/// Buffering is unconditional; visibility only affects display.
#[derive(Debug, Clone)]
pub struct ConsoleRelay {
    config: RelayConfig,
    current: Option<SandboxId>,
    buffer: LogBuffer,
    visible: bool,
    reveal_armed: bool,
}

impl ConsoleRelay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            current: None,
            buffer: LogBuffer::with_capacity(config.max_entries),
            visible: false,
            reveal_armed: true,
        }
    }

    pub fn current(&self) -> Option<SandboxId> {
        self.current
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Switch to a new sandbox. The buffer is emptied, never carried over.
    pub fn reset(&mut self, instance: SandboxId) {
        tracing::debug!(
            %instance,
            discarded = self.buffer.len(),
            evicted = self.buffer.dropped(),
            "Resetting console relay"
        );
        self.current = Some(instance);
        self.buffer.clear();
        self.reveal_armed = true;
    }

    /// Handle one raw cross-boundary message.
    pub fn on_message(&mut self, raw: &serde_json::Value) -> RelayOutcome {
        let Some(envelope) = parse_envelope(raw) else {
            return RelayOutcome::Ignored;
        };

        if let Some(tag) = envelope.instance {
            if self.current != Some(tag) {
                tracing::debug!(instance = %tag, "Dropping console message from stale sandbox");
                return RelayOutcome::Stale { instance: tag };
            }
        }

        let entry = LogEntry {
            kind: envelope.data.kind,
            message: envelope.data.message,
        };
        self.buffer.push(entry.clone());

        let mut revealed = false;
        if self.reveal_armed {
            self.reveal_armed = false;
            if self.config.auto_reveal && !self.visible {
                self.visible = true;
                revealed = true;
            }
        }

        RelayOutcome::Appended { entry, revealed }
    }

    /// Flip panel visibility. Returns the new state.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

impl Default for ConsoleRelay {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}
