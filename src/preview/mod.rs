//! Live preview pipeline.
//!
//! Three untrusted fragments are composed into one document, the document is
//! run behind a script-only frame sandbox, and the console calls it makes are
//! relayed back to the host as [`LogEntry`] values:
//!
//! ```text
//! SourceBundle -> compose -> Sandbox (data: URI, sandbox="allow-scripts")
//!                                |
//!                     postMessage({type: "console", ...})
//!                                v
//!                          ConsoleRelay -> LogBuffer
//! ```

mod bundle;
mod composer;
mod instrument;
mod relay;
mod sandbox;

pub use bundle::{FragmentKind, SourceBundle, UnknownFragmentKind};
pub use composer::{compose, compose_static, compose_tagged, ComposedDocument};
pub use instrument::{
    instrumentation_script, parse_envelope, ConsoleEnvelope, ConsolePayload, LogKind,
    CONSOLE_ENVELOPE_TYPE,
};
pub use relay::{
    ConsoleRelay, LogBuffer, LogEntry, RelayConfig, RelayOutcome, DEFAULT_MAX_LOG_ENTRIES,
};
pub use sandbox::{data_uri, decode_data_uri, Sandbox, SandboxId, CSP_HEADER_VALUE, SANDBOX_FLAGS};
