//! Source fragments that make up a preview document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three editable fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FragmentKind {
    #[serde(rename = "html")]
    Markup,
    #[serde(rename = "css")]
    Style,
    #[serde(rename = "javascript")]
    Script,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 3] = [
        FragmentKind::Markup,
        FragmentKind::Style,
        FragmentKind::Script,
    ];

    /// Wire identifier used by the language selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::Markup => "html",
            FragmentKind::Style => "css",
            FragmentKind::Script => "javascript",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FragmentKind::Markup => "HTML",
            FragmentKind::Style => "CSS",
            FragmentKind::Script => "JavaScript",
        }
    }
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fragment kind: {0}")]
pub struct UnknownFragmentKind(pub String);

impl FromStr for FragmentKind {
    type Err = UnknownFragmentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(FragmentKind::Markup),
            "css" => Ok(FragmentKind::Style),
            "javascript" => Ok(FragmentKind::Script),
            other => Err(UnknownFragmentKind(other.to_string())),
        }
    }
}

/// The unit of composition: markup, style and script text.
///
/// Fragments are never validated. Whatever the author typed is carried
/// verbatim into the composed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceBundle {
    #[serde(rename = "html", default)]
    pub markup: String,
    #[serde(rename = "css", default)]
    pub style: String,
    #[serde(rename = "js", default)]
    pub script: String,
}

impl SourceBundle {
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    /// Content the editor resets to when the author clears their code.
    pub fn starter() -> Self {
        Self::new(
            "<h1>Hello World</h1>",
            "body { background: #f0f0f0; }",
            "console.log(\"Hello\")",
        )
    }

    pub fn get(&self, kind: FragmentKind) -> &str {
        match kind {
            FragmentKind::Markup => &self.markup,
            FragmentKind::Style => &self.style,
            FragmentKind::Script => &self.script,
        }
    }

    /// Replace one fragment. Returns `true` when the text actually changed.
    pub fn set(&mut self, kind: FragmentKind, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = match kind {
            FragmentKind::Markup => &mut self.markup,
            FragmentKind::Style => &mut self.style,
            FragmentKind::Script => &mut self.script,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }
}
