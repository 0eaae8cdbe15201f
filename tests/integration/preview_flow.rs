//! Integration tests for the edit -> compose -> sandbox -> console loop
//!
//! Scripts run in the headless frame where that is enough. Output that needs
//! a real browser (click handlers, timers) is simulated by posting the
//! envelopes the instrumentation would post.

use std::sync::{Arc, Mutex};

use super::common::fixtures::console_message;
use super::common::frame::Frame;
use serde_json::json;
use webpad::editor::PreviewSession;
use webpad::preview::{
    compose, decode_data_uri, FragmentKind, LogEntry, LogKind, RelayConfig, RelayOutcome,
};
use webpad::SourceBundle;

fn entries(session: &PreviewSession) -> Vec<LogEntry> {
    session.relay().buffer().to_vec()
}

/// Instrumentation sits in the head, ahead of the markup, so handlers
/// defined inline in the markup are already wrapped when they fire.
#[test]
fn test_inline_handler_output_is_captured() {
    let bundle = SourceBundle::new("<button onclick='console.log(1)'>x</button>", "", "");
    let mut session = PreviewSession::new(bundle, RelayConfig::default());

    let document = decode_data_uri(&session.current().src).unwrap();
    let patch = document.find("console[type] = function").unwrap();
    let button = document.find("<button onclick").unwrap();
    assert!(patch < button);

    // The click
    let instance = session.sandbox().id();
    session.receive_console(&console_message(Some(instance), LogKind::Log, "1"));

    assert_eq!(entries(&session), vec![LogEntry::new(LogKind::Log, "1")]);
    assert!(session.relay().is_visible());
}

#[test]
fn test_serialized_object_reaches_buffer_verbatim() {
    let mut session = PreviewSession::new(
        SourceBundle::new("", "", "console.error({a:1})"),
        RelayConfig::default(),
    );

    let mut frame = Frame::new();
    frame.load_document(session.sandbox().document().as_str());
    for post in frame.posted() {
        session.receive_console(&post.message);
    }

    assert_eq!(
        entries(&session),
        vec![LogEntry::new(LogKind::Error, "{\"a\":1}")]
    );
}

#[test]
fn test_synchronous_calls_keep_program_order() {
    let mut session = PreviewSession::new(
        SourceBundle::new("", "", "console.log('a'); console.warn('b'); console.error('c')"),
        RelayConfig::default(),
    );

    let mut frame = Frame::new();
    frame.load_document(session.sandbox().document().as_str());
    for post in frame.posted() {
        session.receive_console(&post.message);
    }

    assert_eq!(
        entries(&session),
        vec![
            LogEntry::new(LogKind::Log, "a"),
            LogEntry::new(LogKind::Warn, "b"),
            LogEntry::new(LogKind::Error, "c"),
        ]
    );
}

#[test]
fn test_rapid_edits_only_show_latest_sandbox() {
    let mut session = PreviewSession::new(SourceBundle::default(), RelayConfig::default());

    let b1 = session
        .set_fragment(FragmentKind::Script, "setInterval(() => console.log('b1'), 1)")
        .unwrap();
    session.receive_console(&console_message(Some(b1.instance), LogKind::Log, "b1"));

    let b2 = session
        .set_fragment(FragmentKind::Script, "console.log('b2')")
        .unwrap();
    assert!(entries(&session).is_empty());

    // b1's timer fires once more before its frame is gone.
    let late = session.receive_console(&console_message(Some(b1.instance), LogKind::Log, "b1"));
    assert_eq!(late, RelayOutcome::Stale { instance: b1.instance });
    session.receive_console(&console_message(Some(b2.instance), LogKind::Log, "b2"));

    assert_eq!(entries(&session), vec![LogEntry::new(LogKind::Log, "b2")]);
}

#[test]
fn test_foreign_messages_leave_buffer_untouched() {
    let mut session = PreviewSession::new(SourceBundle::default(), RelayConfig::default());
    let instance = Some(session.sandbox().id());
    session.receive_console(&console_message(instance, LogKind::Log, "kept"));

    for noise in [
        json!({"data": {"type": "log", "message": "no type"}}),
        json!({"type": "webpackOk"}),
        json!("console"),
        json!(null),
        json!({"type": "console", "data": {"type": "debug", "message": "x"}}),
    ] {
        assert_eq!(session.receive_console(&noise), RelayOutcome::Ignored);
    }

    assert_eq!(entries(&session), vec![LogEntry::new(LogKind::Log, "kept")]);
}

#[test]
fn test_observers_see_every_recomposition() {
    let mut session = PreviewSession::new(SourceBundle::default(), RelayConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    session
        .editor_mut()
        .subscribe(move |bundle| sink.lock().unwrap().push(compose(bundle)));

    session.set_fragment(FragmentKind::Style, "p { color: red; }");
    session.set_active(FragmentKind::Script);
    session.edit_active("console.log(1)");
    session.set_fragment_by_id("typescript", "let x: number = 1");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[1],
        compose(&SourceBundle::new("", "p { color: red; }", "console.log(1)"))
    );
}

#[test]
fn test_toggle_hides_without_dropping_entries() {
    let mut session = PreviewSession::new(SourceBundle::default(), RelayConfig::default());
    let instance = Some(session.sandbox().id());
    session.receive_console(&console_message(instance, LogKind::Warn, "w"));
    assert!(session.relay().is_visible());

    assert!(!session.toggle_console());
    session.receive_console(&console_message(instance, LogKind::Log, "while hidden"));
    assert_eq!(entries(&session).len(), 2);
    assert!(!session.relay().is_visible());

    // Only the first entry after a reload reveals the panel again.
    session.set_fragment(FragmentKind::Markup, "<p>new</p>");
    let instance = Some(session.sandbox().id());
    session.receive_console(&console_message(instance, LogKind::Log, "fresh"));
    assert!(session.relay().is_visible());
}

#[test]
fn test_untagged_envelopes_are_accepted() {
    let mut session = PreviewSession::new(SourceBundle::default(), RelayConfig::default());
    session.receive_console(&json!({"type": "console", "data": {"type": "log", "message": "legacy"}}));
    assert_eq!(entries(&session), vec![LogEntry::new(LogKind::Log, "legacy")]);
}

#[test]
fn test_capacity_bounds_buffer() {
    let mut session = PreviewSession::new(
        SourceBundle::default(),
        RelayConfig {
            max_entries: 3,
            auto_reveal: false,
        },
    );
    let instance = Some(session.sandbox().id());
    for i in 0..5 {
        session.receive_console(&console_message(instance, LogKind::Log, &i.to_string()));
    }

    let messages: Vec<String> = entries(&session).into_iter().map(|e| e.message).collect();
    assert_eq!(messages, vec!["2", "3", "4"]);
    assert_eq!(session.relay().buffer().dropped(), 2);
    assert!(!session.relay().is_visible());
}
