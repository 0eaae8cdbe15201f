//! A headless preview frame.
//!
//! Runs the `<script>` blocks of a composed document in an embedded
//! JavaScript engine. `window.parent.postMessage` and the frame's own console
//! methods are recording stubs, so tests see exactly what the
//! instrumentation posts and which original console calls still happen.

use boa_engine::{Context, Source};
use serde_json::Value;

const HOST_STUBS: &str = r#"
var posted = [];
var calls = [];
var window = {
  parent: {
    postMessage: function (message, target) {
      posted.push({ message: message, target: target });
    }
  }
};
function recordCall(type) {
  return function () { calls.push({ type: type, args: arguments.length }); };
}
var console = { log: recordCall('log'), warn: recordCall('warn'), error: recordCall('error') };
"#;

/// One `postMessage` call made by the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    pub message: Value,
    pub target: String,
}

/// One call that reached the console method the frame started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalCall {
    pub kind: String,
    pub args: usize,
}

impl OriginalCall {
    pub fn new(kind: &str, args: usize) -> Self {
        Self {
            kind: kind.to_string(),
            args,
        }
    }
}

pub struct Frame {
    context: Context,
}

impl Frame {
    pub fn new() -> Self {
        let mut frame = Self {
            context: Context::default(),
        };
        frame.run(HOST_STUBS);
        frame
    }

    /// A frame whose parent rejects every message, as after it is detached.
    pub fn detached() -> Self {
        let mut frame = Self::new();
        frame.run("window.parent.postMessage = function () { throw new Error('detached'); };");
        frame
    }

    pub fn run(&mut self, script: &str) {
        if let Err(e) = self.context.eval(Source::from_bytes(script)) {
            panic!("script failed: {e}\n{script}");
        }
    }

    /// Run every `<script>` block of `document` in document order.
    pub fn load_document(&mut self, document: &str) {
        for script in script_blocks(document) {
            self.run(script);
        }
    }

    pub fn posted(&mut self) -> Vec<Posted> {
        self.read("posted")
            .as_array()
            .expect("posted is an array")
            .iter()
            .map(|post| Posted {
                message: post["message"].clone(),
                target: post["target"].as_str().unwrap_or_default().to_string(),
            })
            .collect()
    }

    pub fn original_calls(&mut self) -> Vec<OriginalCall> {
        self.read("calls")
            .as_array()
            .expect("calls is an array")
            .iter()
            .map(|call| OriginalCall {
                kind: call["type"].as_str().unwrap_or_default().to_string(),
                args: call["args"].as_u64().unwrap_or_default() as usize,
            })
            .collect()
    }

    fn read(&mut self, global: &str) -> Value {
        let code = format!("JSON.stringify({global})");
        let value = self
            .context
            .eval(Source::from_bytes(&code))
            .unwrap_or_else(|e| panic!("failed to read {global}: {e}"));
        let text = value
            .to_string(&mut self.context)
            .unwrap_or_else(|e| panic!("failed to read {global}: {e}"))
            .to_std_string_escaped();
        serde_json::from_str(&text).expect("frame state is JSON")
    }
}

/// Bodies of the plain `<script>` elements in `document`, in order.
pub fn script_blocks(document: &str) -> Vec<&str> {
    document
        .split("<script>")
        .skip(1)
        .filter_map(|rest| rest.split_once("</script>").map(|(body, _)| body))
        .collect()
}
