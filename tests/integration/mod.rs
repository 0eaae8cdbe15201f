//! Integration tests for webpad
//!
//! These tests verify that multiple components work together correctly.

#[path = "../common/mod.rs"]
pub mod common;

pub mod cli;
pub mod instrumentation;
pub mod preview_flow;
pub mod snippet_persistence;
