//! HTTP request handlers for the webpad API.

pub mod preview;
pub mod snippets;
