//! Persistence operations for the call journal and action log.
//!
//! Writes go through [`open_call`], [`record_action`], [`finish_call`],
//! [`record_feedback`], and [`record_call_evaluation`]. Reads are the
//! dashboard helpers: [`get_call`], [`list_calls`], [`actions_for_call`],
//! and [`kpis`].

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::action::{ActionKind, AgentAction, CallRecord};
use crate::error::ObserveError;

const CALL_COLUMNS: &str = "id, room_id, caller_number, started_at, ended_at, duration_seconds, \
     transcript, summary, status, client_id, compliance_evaluation, resolution_evaluation";

fn map_row_to_call(row: &Row<'_>) -> rusqlite::Result<CallRecord> {
    Ok(CallRecord {
        id: row.get(0)?,
        room_id: row.get(1)?,
        caller_number: row.get(2)?,
        started_at: row.get(3)?,
        ended_at: row.get(4)?,
        duration_seconds: row.get(5)?,
        transcript: row.get(6)?,
        summary: row.get(7)?,
        status: row.get(8)?,
        client_id: row.get(9)?,
        compliance_evaluation: row.get(10)?,
        resolution_evaluation: row.get(11)?,
    })
}

/// Opens a journal row for a new call and returns its id.
pub fn open_call(
    conn: &Connection,
    room_id: &str,
    caller_number: Option<&str>,
) -> Result<i64, ObserveError> {
    conn.execute(
        "INSERT INTO call_journal (room_id, caller_number) VALUES (?1, ?2)",
        params![room_id, caller_number],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Records the confirmed client for a call. Called on the confirmation
/// transition so the dashboard can compute identification rates.
pub fn set_call_client(
    conn: &Connection,
    journal_id: i64,
    client_id: i64,
) -> Result<bool, ObserveError> {
    let affected = conn.execute(
        "UPDATE call_journal SET client_id = ?1 WHERE id = ?2",
        params![client_id, journal_id],
    )?;
    Ok(affected > 0)
}

/// Final data written when a call ends.
#[derive(Debug, Clone, Default)]
pub struct CallEnd {
    pub transcript: Option<String>,
    pub summary: Option<String>,
    /// Final status label; defaults to "Terminé" when empty.
    pub status: Option<String>,
}

/// Finalises a call's journal row: end timestamp, duration, transcript,
/// summary, status. Only the first finalisation wins: a row that already
/// has an end timestamp is left untouched.
pub fn finish_call(conn: &Connection, journal_id: i64, end: &CallEnd) -> Result<bool, ObserveError> {
    let status = end.status.as_deref().unwrap_or("Terminé");
    let affected = conn.execute(
        "UPDATE call_journal
         SET ended_at = datetime('now'),
             duration_seconds = CAST((julianday('now') - julianday(started_at)) * 86400 AS INTEGER),
             transcript = ?1,
             summary = ?2,
             status = ?3
         WHERE id = ?4 AND ended_at IS NULL",
        params![end.transcript, end.summary, status, journal_id],
    )?;
    Ok(affected > 0)
}

/// Appends one action to a call's audit trail and returns the row id.
///
/// `params_value` is serialised to JSON; pass `None` for parameter-less
/// actions.
pub fn record_action(
    conn: &Connection,
    journal_id: i64,
    kind: ActionKind,
    tool_name: Option<&str>,
    params_value: Option<&serde_json::Value>,
    result: Option<&str>,
    detail: Option<&str>,
) -> Result<i64, ObserveError> {
    let params_json = params_value.map(serde_json::to_string).transpose()?;
    conn.execute(
        "INSERT INTO agent_actions (journal_id, kind, tool_name, params_json, result, detail)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            journal_id,
            kind.as_str(),
            tool_name,
            params_json,
            result,
            detail
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Records an end-of-call satisfaction note (1–5) with an optional
/// comment.
pub fn record_feedback(
    conn: &Connection,
    journal_id: i64,
    note: i64,
    comment: Option<&str>,
) -> Result<i64, ObserveError> {
    if !(1..=5).contains(&note) {
        return Err(ObserveError::InvalidFeedbackNote(note));
    }
    conn.execute(
        "INSERT INTO call_feedback (journal_id, note, comment) VALUES (?1, ?2, ?3)",
        params![journal_id, note, comment],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Records the summary and quality assessment produced by the post-call
/// evaluation job.
pub fn record_call_evaluation(
    conn: &Connection,
    journal_id: i64,
    summary: &str,
    compliance: &str,
    resolution: &str,
) -> Result<bool, ObserveError> {
    let affected = conn.execute(
        "UPDATE call_journal
         SET summary = ?1, compliance_evaluation = ?2, resolution_evaluation = ?3
         WHERE id = ?4",
        params![summary, compliance, resolution, journal_id],
    )?;
    Ok(affected > 0)
}

/// Retrieves one journal row by id.
pub fn get_call(conn: &Connection, journal_id: i64) -> Result<Option<CallRecord>, ObserveError> {
    let sql = format!("SELECT {CALL_COLUMNS} FROM call_journal WHERE id = ?1");
    Ok(conn
        .query_row(&sql, [journal_id], map_row_to_call)
        .optional()?)
}

/// Retrieves one journal row by LiveKit room id.
pub fn get_call_by_room(
    conn: &Connection,
    room_id: &str,
) -> Result<Option<CallRecord>, ObserveError> {
    let sql = format!("SELECT {CALL_COLUMNS} FROM call_journal WHERE room_id = ?1");
    Ok(conn
        .query_row(&sql, [room_id], map_row_to_call)
        .optional()?)
}

/// Lists journal rows, most recent first, for the dashboard call table.
pub fn list_calls(
    conn: &Connection,
    limit: i64,
    offset: i64,
) -> Result<Vec<CallRecord>, ObserveError> {
    let sql = format!(
        "SELECT {CALL_COLUMNS} FROM call_journal
         ORDER BY started_at DESC, id DESC
         LIMIT ?1 OFFSET ?2"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit, offset], map_row_to_call)?;
    let mut calls = Vec::new();
    for row in rows {
        calls.push(row?);
    }
    Ok(calls)
}

/// Returns a call's action trail in append order.
pub fn actions_for_call(
    conn: &Connection,
    journal_id: i64,
) -> Result<Vec<AgentAction>, ObserveError> {
    let mut stmt = conn.prepare(
        "SELECT id, journal_id, occurred_at, kind, tool_name, params_json, result, detail
         FROM agent_actions
         WHERE journal_id = ?1
         ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([journal_id], |row| {
        Ok(AgentAction {
            id: row.get(0)?,
            journal_id: row.get(1)?,
            occurred_at: row.get(2)?,
            kind: row.get(3)?,
            tool_name: row.get(4)?,
            params_json: row.get(5)?,
            result: row.get(6)?,
            detail: row.get(7)?,
        })
    })?;
    let mut actions = Vec::new();
    for row in rows {
        actions.push(row?);
    }
    Ok(actions)
}

/// Per-tool usage count for the KPI panel.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolUsage {
    pub tool_name: String,
    pub count: i64,
}

/// Aggregate indicators for the dashboard KPI panel.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DashboardKpis {
    pub total_calls: i64,
    pub average_duration_seconds: f64,
    /// Share of calls that reached a confirmed identity, 0–100.
    pub identity_confirmation_rate: f64,
    pub unconfirmed_calls: i64,
    /// Top five tools by invocation count.
    pub top_tools: Vec<ToolUsage>,
}

/// Computes the dashboard KPI aggregates.
pub fn kpis(conn: &Connection) -> Result<DashboardKpis, ObserveError> {
    let total_calls: i64 =
        conn.query_row("SELECT COUNT(*) FROM call_journal", [], |row| row.get(0))?;

    let average_duration_seconds: f64 = conn.query_row(
        "SELECT COALESCE(AVG(duration_seconds), 0.0) FROM call_journal
         WHERE duration_seconds IS NOT NULL",
        [],
        |row| row.get(0),
    )?;

    let confirmed_calls: i64 = conn.query_row(
        "SELECT COUNT(*) FROM call_journal WHERE client_id IS NOT NULL",
        [],
        |row| row.get(0),
    )?;

    let identity_confirmation_rate = if total_calls > 0 {
        confirmed_calls as f64 / total_calls as f64 * 100.0
    } else {
        0.0
    };

    let mut stmt = conn.prepare(
        "SELECT tool_name, COUNT(*) AS uses
         FROM agent_actions
         WHERE kind = 'TOOL_CALL' AND tool_name IS NOT NULL
         GROUP BY tool_name
         ORDER BY uses DESC
         LIMIT 5",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ToolUsage {
            tool_name: row.get(0)?,
            count: row.get(1)?,
        })
    })?;
    let mut top_tools = Vec::new();
    for row in rows {
        top_tools.push(row?);
    }

    Ok(DashboardKpis {
        total_calls,
        average_duration_seconds,
        identity_confirmation_rate,
        unconfirmed_calls: total_calls - confirmed_calls,
        top_tools,
    })
}
