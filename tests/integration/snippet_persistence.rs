//! Integration tests for saving editor sessions and reading them back
//! from a file-backed database.

use super::common::fixtures::TestDb;
use webpad::core::services::{SaveOutcome, SnippetService};
use webpad::data::SnippetStore;
use webpad::editor::PreviewSession;
use webpad::preview::{decode_data_uri, FragmentKind, RelayConfig};
use webpad::{SourceBundle, Viewer};

fn user(id: &str) -> Viewer {
    Viewer::User(id.to_string())
}

#[test]
fn test_saved_session_survives_reopen() {
    let db = TestDb::new();
    let snippet_id = {
        let core = db.core();
        let mut session = PreviewSession::new(SourceBundle::starter(), RelayConfig::default());
        session.set_fragment(FragmentKind::Style, "h1 { color: teal; }");

        let outcome =
            SnippetService::save_session(&core, &user("ana"), &mut session, Some("Teal")).unwrap();
        outcome.snippet().id
    };

    // Migrations run again on reopen and must leave the data alone.
    let core = db.core();
    let snippet = SnippetService::get(&core, snippet_id).unwrap();
    assert_eq!(snippet.title, "Teal");
    assert_eq!(snippet.css, "h1 { color: teal; }");

    let mut session = PreviewSession::new(SourceBundle::default(), RelayConfig::default());
    let reload = session.load(snippet.bundle(), snippet.title.clone(), Some(snippet.id));
    let document = decode_data_uri(&reload.src).unwrap();
    assert!(document.contains("<style>h1 { color: teal; }</style>"));
    assert!(document.contains("<body><h1>Hello World</h1></body>"));
}

#[test]
fn test_owner_save_updates_and_visitor_save_copies() {
    let db = TestDb::new();
    let core = db.core();

    let mut ana_session = PreviewSession::new(SourceBundle::starter(), RelayConfig::default());
    let original = SnippetService::save_session(&core, &user("ana"), &mut ana_session, None)
        .unwrap()
        .snippet()
        .clone();

    ana_session.set_fragment(FragmentKind::Script, "console.warn('v2')");
    let outcome = SnippetService::save_session(&core, &user("ana"), &mut ana_session, None).unwrap();
    assert!(matches!(outcome, SaveOutcome::Updated(ref s) if s.id == original.id));

    let mut bo_session = PreviewSession::new(SourceBundle::default(), RelayConfig::default());
    let snippet = SnippetService::get(&core, original.id).unwrap();
    bo_session.load(snippet.bundle(), snippet.title, Some(snippet.id));
    let outcome =
        SnippetService::save_session(&core, &user("bo"), &mut bo_session, Some("Bo's")).unwrap();
    let SaveOutcome::Created(copy) = outcome else {
        panic!("visitor save must create a copy");
    };
    assert_eq!(copy.js, "console.warn('v2')");

    let store = SnippetStore::new(db.open().connection());
    assert_eq!(store.list_by_owner("ana").unwrap().len(), 1);
    assert_eq!(store.list_by_owner("bo").unwrap().len(), 1);
}
