//! Console Session Tests
//!
//! Whole menu sessions driven from scripted input:
//! - Every menu entry reaches the engine
//! - Failed requests are reported and the menu continues
//! - Exit and end of input both end the session cleanly

mod common;

use common::{console, output, Call, RecordingEngine};
use rmconsole::cli::Session;
use rmconsole::engine::{RecordEngine, RecordId};
use rmconsole::ops::MatchMode;
use rmconsole::value::Value;

// =============================================================================
// Helper Functions
// =============================================================================

fn run_session(mode: MatchMode, input: &str) -> (RecordingEngine, String) {
    let mut session = Session::new(RecordingEngine::new(), console(input), mode);
    session.run().unwrap();
    let (engine, console) = session.into_parts();
    (engine, output(console))
}

const CREATE_PEOPLE: &str = "1\npeople\n2\nid I\nname S 50\n";

// =============================================================================
// Full Session Tests
// =============================================================================

/// Create, fill, modify, erase and drop a table in one session.
#[test]
fn test_full_lifecycle() {
    let script = format!(
        "{}3\npeople\n3\n1 alice\n2 bob\n3 carol\n5\npeople\n1\n1\n0 2\nrobert\n4\npeople\n1\n0 1\n2\npeople\n6\n",
        CREATE_PEOPLE
    );
    let (engine, out) = run_session(MatchMode::Scan, &script);

    assert!(out.contains("Construction complete."));
    assert!(out.contains("Insertion complete.\n3 of 3 iterations applied, 0 skipped, 0 failed, 3 rows affected"));
    assert!(out.contains("Modification complete.\n1 of 1 iterations applied, 0 skipped, 0 failed, 1 rows affected"));
    assert!(out.contains("Deletion complete.\n1 of 1 iterations applied, 0 skipped, 0 failed, 1 rows affected"));
    assert!(out.contains("Erasure complete."));

    assert!(engine.calls.contains(&Call::Update(RecordId::new(0, 1))));
    assert!(engine.calls.contains(&Call::RemoveById(RecordId::new(0, 0))));
    assert_eq!(engine.calls.last(), Some(&Call::Shutdown));
    assert!(!engine.inner.has_table("people"));
    assert!(engine.inner.is_shut_down());
}

/// Rows written by one request are what the next request matches against.
#[test]
fn test_modification_is_visible_to_later_requests() {
    let script = format!(
        "{}3\npeople\n2\n1 alice\n2 bob\n5\npeople\n1\n1\n0 2\nrobert\n4\npeople\n1\n1 robert\n6\n",
        CREATE_PEOPLE
    );
    let (engine, out) = run_session(MatchMode::Scan, &script);

    assert!(out.contains("Deletion complete.\n1 of 1 iterations applied, 0 skipped, 0 failed, 1 rows affected"));
    assert!(engine.calls.contains(&Call::RemoveById(RecordId::new(0, 1))));
    assert_eq!(engine.inner.row_count("people"), 1);
    assert!(engine.calls.contains(&Call::Bind {
        index: 1,
        value: Value::text("robert"),
    }));
}

/// Identity mode reports each iteration as failed and leaves rows alone.
#[test]
fn test_identity_mode_session() {
    let script = format!("{}3\npeople\n1\n1 alice\n4\npeople\n1\n0 1\n6\n", CREATE_PEOPLE);
    let (engine, out) = run_session(MatchMode::Identity, &script);

    assert!(out.contains("Operation failed: record unassigned not found"));
    assert!(out.contains("Deletion complete.\n0 of 1 iterations applied, 0 skipped, 1 failed, 0 rows affected"));
    assert_eq!(engine.inner.row_count("people"), 1);
}

// =============================================================================
// Failure Handling Tests
// =============================================================================

/// A request against a missing table fails and the menu comes back.
#[test]
fn test_missing_table_returns_to_menu() {
    let (engine, out) = run_session(MatchMode::Scan, "3\nghost\n6\n");
    assert!(out.contains("Operation failed: table 'ghost' not found"));
    assert_eq!(out.matches("Choices: ").count(), 2);
    assert_eq!(engine.calls, vec![Call::OpenTable("ghost".to_string()), Call::Shutdown]);
}

/// A malformed number aborts only the current request.
#[test]
fn test_bad_number_aborts_request_only() {
    let script = format!("{}3\npeople\n1\nx\n2\npeople\n6\n", CREATE_PEOPLE);
    let (engine, out) = run_session(MatchMode::Scan, &script);

    assert!(out.contains("Operation failed: expected an integer, got 'x'"));
    assert!(out.contains("Erasure complete."));
    assert_eq!(engine.inner.live_records(), 0);
}

/// Answers left on the line of a failed request never reach the menu.
#[test]
fn test_leftover_tokens_are_not_menu_selections() {
    let script = format!("{}3\npeople\n1\nx 2\n6\n", CREATE_PEOPLE);
    let (engine, out) = run_session(MatchMode::Scan, &script);

    assert!(out.contains("Operation failed: expected an integer, got 'x'"));
    assert!(!out.contains("Table to erase: "));
    assert_eq!(engine.count(|c| matches!(c, Call::DeleteTable(_))), 0);
    assert!(engine.inner.has_table("people"));
    assert_eq!(
        &engine.calls[engine.calls.len() - 2..],
        &[Call::CloseTable("people".to_string()), Call::Shutdown]
    );
}

/// Creating a table twice reports the duplicate.
#[test]
fn test_duplicate_table() {
    let script = format!("{}{}6\n", CREATE_PEOPLE, CREATE_PEOPLE);
    let (engine, out) = run_session(MatchMode::Scan, &script);
    assert_eq!(out.matches("Construction complete.").count(), 1);
    assert!(out.contains("Operation failed: table 'people' already exists"));
    assert_eq!(engine.count(|c| matches!(c, Call::CreateTable(_))), 2);
}

// =============================================================================
// Session End Tests
// =============================================================================

/// End of input in the middle of a request ends the session without error.
#[test]
fn test_end_of_input_mid_request() {
    let script = format!("{}3\npeople\n2\n1 alice\n2", CREATE_PEOPLE);
    let (engine, _) = run_session(MatchMode::Scan, &script);

    assert_eq!(engine.inner.row_count("people"), 1);
    assert_eq!(engine.inner.open_handles("people"), 0);
    assert_eq!(engine.inner.live_records(), 0);
    assert_eq!(engine.calls.last(), Some(&Call::Shutdown));
}

/// The menu text matches what operators expect.
#[test]
fn test_menu_text() {
    let (_, out) = run_session(MatchMode::Scan, "6\n");
    assert_eq!(
        out,
        "\nDatabase Operations Menu\n[1] Construct Table\n[2] Remove Table\n[3] Add Entry\n\
         [4] Erase Entry\n[5] Modify Entry\n[6] Exit System\nChoices: "
    );
}

/// A closed engine refuses new tables.
#[test]
fn test_engine_is_shut_down_after_exit() {
    let (mut engine, _) = run_session(MatchMode::Scan, "6\n");
    assert!(engine.create_table("late", common::people_schema()).is_err());
}
