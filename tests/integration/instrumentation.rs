//! The console instrumentation, executed.
//!
//! Each test runs a composed document's scripts in a headless frame and feeds
//! whatever the frame posted into a preview session's relay.

use super::common::frame::{script_blocks, Frame, OriginalCall};
use serde_json::json;
use webpad::editor::PreviewSession;
use webpad::preview::{instrumentation_script, LogEntry, LogKind, RelayConfig, RelayOutcome};
use webpad::SourceBundle;

fn session_with_script(script: &str) -> PreviewSession {
    PreviewSession::new(SourceBundle::new("", "", script), RelayConfig::default())
}

fn run(session: &PreviewSession) -> Frame {
    let mut frame = Frame::new();
    frame.load_document(session.sandbox().document().as_str());
    frame
}

fn deliver(session: &mut PreviewSession, frame: &mut Frame) -> Vec<RelayOutcome> {
    frame
        .posted()
        .into_iter()
        .map(|post| session.receive_console(&post.message))
        .collect()
}

#[test]
fn test_instrumentation_runs_before_user_script() {
    let session = session_with_script("console.log('x')");
    let document = session.sandbox().document().as_str().to_string();
    let blocks = script_blocks(&document);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1], "console.log('x')");
    assert!(blocks[0].contains("window.parent.postMessage"));
}

#[test]
fn test_posts_every_call_to_any_origin_with_instance_tag() {
    let mut session = session_with_script("console.log('a'); console.warn('b'); console.error('c');");
    let mut frame = run(&session);

    let posted = frame.posted();
    assert_eq!(posted.len(), 3);
    let instance = session.sandbox().id().to_string();
    for post in &posted {
        assert_eq!(post.target, "*");
        assert_eq!(post.message["type"], "console");
        assert_eq!(post.message["instance"], instance.as_str());
    }

    deliver(&mut session, &mut frame);
    assert_eq!(
        session.relay().buffer().to_vec(),
        vec![
            LogEntry::new(LogKind::Log, "a"),
            LogEntry::new(LogKind::Warn, "b"),
            LogEntry::new(LogKind::Error, "c"),
        ]
    );
}

#[test]
fn test_arguments_are_formatted_into_one_message() {
    let mut session = session_with_script(
        "var o = { name: 'loop' }; o.self = o;
         console.log(o);
         console.error({a: 1});
         console.log(1, 'x', null, undefined, [1, 2]);
         console.warn('still running');",
    );
    let mut frame = run(&session);
    deliver(&mut session, &mut frame);

    assert_eq!(
        session.relay().buffer().to_vec(),
        vec![
            LogEntry::new(LogKind::Log, "[object Object]"),
            LogEntry::new(LogKind::Error, "{\"a\":1}"),
            LogEntry::new(LogKind::Log, "1 x null undefined [1,2]"),
            LogEntry::new(LogKind::Warn, "still running"),
        ]
    );
}

#[test]
fn test_original_console_methods_still_run() {
    let session = session_with_script("console.log('a', 'b'); console.warn(); console.error({});");
    let mut frame = run(&session);

    assert_eq!(
        frame.original_calls(),
        vec![
            OriginalCall::new("log", 2),
            OriginalCall::new("warn", 0),
            OriginalCall::new("error", 1),
        ]
    );
    let messages: Vec<_> = frame
        .posted()
        .iter()
        .map(|post| post.message["data"]["message"].clone())
        .collect();
    assert_eq!(messages, vec![json!("a b"), json!(""), json!("{}")]);
}

#[test]
fn test_unreachable_parent_does_not_break_console() {
    let session = session_with_script("console.log('x'); console.error('y');");
    let mut frame = Frame::detached();
    frame.load_document(session.sandbox().document().as_str());

    assert!(frame.posted().is_empty());
    assert_eq!(
        frame.original_calls(),
        vec![OriginalCall::new("log", 1), OriginalCall::new("error", 1)]
    );
}

#[test]
fn test_untagged_script_posts_plain_envelope() {
    let mut frame = Frame::new();
    frame.run(&instrumentation_script(None));
    frame.run("console.warn('b')");

    let posted = frame.posted();
    assert_eq!(
        posted[0].message,
        json!({"type": "console", "data": {"type": "warn", "message": "b"}})
    );

    let mut session = session_with_script("");
    assert!(matches!(
        session.receive_console(&posted[0].message),
        RelayOutcome::Appended { .. }
    ));
}

#[test]
fn test_replaced_frame_output_is_stale() {
    let mut session = session_with_script("console.log('one')");
    let mut old_frame = run(&session);
    let old_instance = session.sandbox().id();

    let reload = session
        .set_fragment(webpad::preview::FragmentKind::Script, "console.log('two')")
        .unwrap();
    let mut new_frame = run(&session);

    let outcomes = deliver(&mut session, &mut old_frame);
    assert_eq!(outcomes, vec![RelayOutcome::Stale { instance: old_instance }]);
    deliver(&mut session, &mut new_frame);

    assert_eq!(session.relay().current(), Some(reload.instance));
    assert_eq!(
        session.relay().buffer().to_vec(),
        vec![LogEntry::new(LogKind::Log, "two")]
    );
}
