//! Shared test utilities for webpad
//!
//! - Temporary file-backed databases and cores
//! - Console envelopes as the preview frame would post them
//! - A headless preview frame that runs composed documents' scripts

pub mod fixtures;
pub mod frame;
