mod error;
mod snippet_service;

pub use error::ServiceError;
pub use snippet_service::{SaveOutcome, SnippetService};
