//! Composes a [`SourceBundle`] into one executable HTML document.
//!
//! Layout, in document order:
//!
//! 1. style fragment in a `<style>` block in `<head>`
//! 2. instrumentation `<script>` right after it, so console interception is
//!    in place before the parser reaches the body (inline handlers included)
//! 3. markup fragment as the `<body>` content
//! 4. script fragment in a final `<script>` after the body, so every element
//!    it queries already exists
//!
//! Fragments are inserted verbatim. Broken markup or script fails inside the
//! sandbox, never here.

use std::fmt;

use super::bundle::SourceBundle;
use super::instrument::instrumentation_script;
use super::sandbox::SandboxId;

/// Full text of a composed document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComposedDocument(String);

impl ComposedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ComposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComposedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compose a document whose console messages carry no sandbox tag.
pub fn compose(bundle: &SourceBundle) -> ComposedDocument {
    assemble(bundle, Some(&instrumentation_script(None)), true)
}

/// Compose a document whose console messages are tagged with `instance`.
pub fn compose_tagged(bundle: &SourceBundle, instance: &SandboxId) -> ComposedDocument {
    assemble(bundle, Some(&instrumentation_script(Some(instance))), true)
}

/// Markup and style only. Used for snippet thumbnails, where nothing
/// should execute.
pub fn compose_static(bundle: &SourceBundle) -> ComposedDocument {
    assemble(bundle, None, false)
}

fn assemble(bundle: &SourceBundle, instrumentation: Option<&str>, with_script: bool) -> ComposedDocument {
    let mut doc = String::with_capacity(
        160 + bundle.markup.len()
            + bundle.style.len()
            + bundle.script.len()
            + instrumentation.map_or(0, str::len),
    );

    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<style>");
    doc.push_str(&bundle.style);
    doc.push_str("</style>\n");
    if let Some(script) = instrumentation {
        doc.push_str("<script>");
        doc.push_str(script);
        doc.push_str("</script>\n");
    }
    doc.push_str("</head>\n<body>");
    doc.push_str(&bundle.markup);
    doc.push_str("</body>\n");
    if with_script {
        doc.push_str("<script>");
        doc.push_str(&bundle.script);
        doc.push_str("</script>\n");
    }
    doc.push_str("</html>\n");

    ComposedDocument(doc)
}
