//! Tests for the call journal and action log.

use rusqlite::Connection;

use crate::*;

fn test_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    aria_db::run_migrations(&conn).expect("run migrations");
    conn.execute(
        "INSERT INTO clients (id, first_name, last_name, email) VALUES (1, 'Jean', 'Dupont', 'jean.dupont@email.com')",
        [],
    )
    .expect("seed client");
    conn
}

#[test]
fn call_lifecycle_open_confirm_finish() {
    let conn = test_conn();

    let journal_id = open_call(&conn, "sip-inbound-abc", Some("+33612345678"))
        .expect("open_call should succeed");

    let call = get_call(&conn, journal_id)
        .expect("get_call should succeed")
        .expect("call exists");
    assert_eq!(call.room_id, "sip-inbound-abc");
    assert_eq!(call.status, "En cours");
    assert!(call.ended_at.is_none());
    assert!(call.client_id.is_none());

    assert!(set_call_client(&conn, journal_id, 1).expect("set_call_client should succeed"));

    let end = CallEnd {
        transcript: Some("[transcription]".to_string()),
        summary: Some("Demande de détails contrat.".to_string()),
        status: None,
    };
    assert!(finish_call(&conn, journal_id, &end).expect("finish_call should succeed"));

    let finished = get_call(&conn, journal_id)
        .expect("get_call should succeed")
        .expect("call exists");
    assert_eq!(finished.status, "Terminé");
    assert!(finished.ended_at.is_some());
    assert!(finished.duration_seconds.is_some());
    assert_eq!(finished.client_id, Some(1));

    // Second finalisation is a no-op.
    assert!(!finish_call(&conn, journal_id, &end).expect("finish_call should succeed"));
}

#[test]
fn get_call_by_room_resolves() {
    let conn = test_conn();
    let journal_id = open_call(&conn, "sip-inbound-xyz", None).expect("open_call");

    let call = get_call_by_room(&conn, "sip-inbound-xyz")
        .expect("query should succeed")
        .expect("call exists");
    assert_eq!(call.id, journal_id);

    assert!(get_call_by_room(&conn, "missing")
        .expect("query should succeed")
        .is_none());
}

#[test]
fn actions_append_in_order() {
    let conn = test_conn();
    let journal_id = open_call(&conn, "room-1", None).expect("open_call");

    let params = serde_json::json!({"email": "jean.dupont@email.com"});
    record_action(
        &conn,
        journal_id,
        ActionKind::ToolCall,
        Some("lookup_client_by_email"),
        Some(&params),
        None,
        None,
    )
    .expect("record_action should succeed");
    record_action(
        &conn,
        journal_id,
        ActionKind::ToolResult,
        Some("lookup_client_by_email"),
        None,
        Some("J'ai trouvé un dossier pour Jean Dupont."),
        None,
    )
    .expect("record_action should succeed");

    let actions = actions_for_call(&conn, journal_id).expect("actions_for_call should succeed");
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].kind, "TOOL_CALL");
    assert_eq!(
        actions[0].params_json.as_deref(),
        Some(r#"{"email":"jean.dupont@email.com"}"#)
    );
    assert_eq!(actions[1].kind, "TOOL_RESULT");
    assert!(actions[1]
        .result
        .as_deref()
        .expect("result recorded")
        .contains("Jean Dupont"));
}

#[test]
fn action_kind_round_trip() {
    for kind in [
        ActionKind::ToolCall,
        ActionKind::ToolResult,
        ActionKind::AgentSay,
        ActionKind::SystemEvent,
    ] {
        let label = kind.as_str();
        assert_eq!(label.parse::<ActionKind>().expect("parse"), kind);
    }
    assert!("BOGUS".parse::<ActionKind>().is_err());
}

#[test]
fn feedback_note_is_range_checked() {
    let conn = test_conn();
    let journal_id = open_call(&conn, "room-1", None).expect("open_call");

    record_feedback(&conn, journal_id, 4, Some("Très clair.")).expect("valid note");

    let err = record_feedback(&conn, journal_id, 0, None).expect_err("note 0 is out of range");
    assert!(matches!(err, ObserveError::InvalidFeedbackNote(0)));

    let err = record_feedback(&conn, journal_id, 6, None).expect_err("note 6 is out of range");
    assert!(matches!(err, ObserveError::InvalidFeedbackNote(6)));
}

#[test]
fn evaluation_updates_journal_row() {
    let conn = test_conn();
    let journal_id = open_call(&conn, "room-1", None).expect("open_call");

    assert!(record_call_evaluation(
        &conn,
        journal_id,
        "Appel de consultation de contrat.",
        "Conforme",
        "Résolu au premier appel",
    )
    .expect("record_call_evaluation should succeed"));

    let call = get_call(&conn, journal_id)
        .expect("get_call should succeed")
        .expect("call exists");
    assert_eq!(call.compliance_evaluation.as_deref(), Some("Conforme"));
    assert_eq!(
        call.resolution_evaluation.as_deref(),
        Some("Résolu au premier appel")
    );

    assert!(!record_call_evaluation(&conn, 999, "x", "y", "z")
        .expect("record_call_evaluation should succeed"));
}

#[test]
fn list_calls_paginates_most_recent_first() {
    let conn = test_conn();
    for i in 0..4 {
        open_call(&conn, &format!("room-{i}"), None).expect("open_call");
    }

    let page1 = list_calls(&conn, 2, 0).expect("list_calls should succeed");
    assert_eq!(page1.len(), 2);
    assert_eq!(page1[0].room_id, "room-3");

    let page2 = list_calls(&conn, 2, 2).expect("list_calls should succeed");
    assert_eq!(page2.len(), 2);
    assert_eq!(page2[1].room_id, "room-0");
}

#[test]
fn kpis_aggregate_journal_and_actions() {
    let conn = test_conn();

    let confirmed = open_call(&conn, "room-1", None).expect("open_call");
    set_call_client(&conn, confirmed, 1).expect("set_call_client");
    finish_call(&conn, confirmed, &CallEnd::default()).expect("finish_call");

    let anonymous = open_call(&conn, "room-2", None).expect("open_call");

    for _ in 0..3 {
        record_action(
            &conn,
            anonymous,
            ActionKind::ToolCall,
            Some("lookup_client_by_email"),
            None,
            None,
            None,
        )
        .expect("record_action");
    }
    record_action(
        &conn,
        confirmed,
        ActionKind::ToolCall,
        Some("get_client_details"),
        None,
        None,
        None,
    )
    .expect("record_action");

    let kpis = kpis(&conn).expect("kpis should succeed");
    assert_eq!(kpis.total_calls, 2);
    assert_eq!(kpis.unconfirmed_calls, 1);
    assert!((kpis.identity_confirmation_rate - 50.0).abs() < f64::EPSILON);
    assert_eq!(kpis.top_tools[0].tool_name, "lookup_client_by_email");
    assert_eq!(kpis.top_tools[0].count, 3);
}
