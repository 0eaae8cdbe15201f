//! Console instrumentation injected into every preview document, and the
//! envelope it posts back to the host page.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::sandbox::SandboxId;

/// Envelope `type` marking a console message.
pub const CONSOLE_ENVELOPE_TYPE: &str = "console";

/// Console methods intercepted inside the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Log,
    Warn,
    Error,
}

impl LogKind {
    pub const ALL: [LogKind; 3] = [LogKind::Log, LogKind::Warn, LogKind::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Log => "log",
            LogKind::Warn => "warn",
            LogKind::Error => "error",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `data` member of a console envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolePayload {
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub message: String,
}

/// `{ type: "console", instance?, data: { type, message } }`
///
/// Unknown members are ignored. `instance` is absent on documents composed
/// without a sandbox tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEnvelope {
    #[serde(rename = "type")]
    pub envelope_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<SandboxId>,
    pub data: ConsolePayload,
}

impl ConsoleEnvelope {
    pub fn new(instance: Option<SandboxId>, kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            envelope_type: CONSOLE_ENVELOPE_TYPE.to_string(),
            instance,
            data: ConsolePayload {
                kind,
                message: message.into(),
            },
        }
    }
}

/// Check a raw cross-boundary message against the console envelope shape.
///
/// The channel is shared with unrelated traffic, so anything that does not
/// match is `None` rather than an error.
pub fn parse_envelope(raw: &serde_json::Value) -> Option<ConsoleEnvelope> {
    if raw.get("type").and_then(|t| t.as_str()) != Some(CONSOLE_ENVELOPE_TYPE) {
        return None;
    }
    match ConsoleEnvelope::deserialize(raw) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            tracing::trace!(error = %e, "Dropping malformed console envelope");
            None
        }
    }
}

/// Build the script that wraps `console.log`, `console.warn` and
/// `console.error` inside the sandbox.
///
/// Each wrapper formats its arguments into one string, posts the envelope to
/// `window.parent` with target origin `*`, then calls the original method so
/// the sandbox's own devtools still see the call. Formatting never throws:
/// objects go through `JSON.stringify`, falling back to `String()` and then
/// to `Object.prototype.toString`.
pub fn instrumentation_script(instance: Option<&SandboxId>) -> String {
    let instance = match instance {
        Some(id) => format!("\"{}\"", id),
        None => "null".to_string(),
    };

    format!(
        r#"(function () {{
  var instance = {instance};
  var original = {{ log: console.log, warn: console.warn, error: console.error }};
  function coerce(arg) {{
    try {{ return String(arg); }} catch (e) {{ return Object.prototype.toString.call(arg); }}
  }}
  function format(arg) {{
    if (typeof arg === 'object') {{
      try {{ return JSON.stringify(arg); }} catch (e) {{ return coerce(arg); }}
    }}
    return coerce(arg);
  }}
  function relay(type, args) {{
    var envelope = {{ type: '{envelope}', data: {{ type: type, message: args.map(format).join(' ') }} }};
    if (instance !== null) {{ envelope.instance = instance; }}
    try {{ window.parent.postMessage(envelope, '*'); }} catch (e) {{}}
    original[type].apply(console, args);
  }}
  ['{log}', '{warn}', '{error}'].forEach(function (type) {{
    console[type] = function () {{ relay(type, Array.prototype.slice.call(arguments)); }};
  }});
}})();"#,
        instance = instance,
        envelope = CONSOLE_ENVELOPE_TYPE,
        log = LogKind::Log,
        warn = LogKind::Warn,
        error = LogKind::Error,
    )
}
