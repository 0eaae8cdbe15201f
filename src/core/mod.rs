//! Core infrastructure shared by the HTTP API and the preview WebSocket:
//! configuration, snippet storage and viewer identity.

pub mod services;
mod webpad_core;

pub use webpad_core::WebpadCore;
