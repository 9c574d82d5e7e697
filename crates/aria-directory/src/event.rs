//! Client interaction history and upcoming appointments.

use aria_types::ClientEvent;
use rusqlite::{params, Connection, Row};

use crate::DirectoryError;

fn map_row_to_event(row: &Row<'_>) -> rusqlite::Result<ClientEvent> {
    Ok(ClientEvent {
        id: row.get(0)?,
        client_id: row.get(1)?,
        comment: row.get(2)?,
        for_date: row.get(3)?,
        is_completed: row.get(4)?,
    })
}

/// Returns a client's interaction history, most recent first.
pub fn client_history(
    conn: &Connection,
    client_id: i64,
    limit: u32,
) -> Result<Vec<ClientEvent>, DirectoryError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, comment, for_date, is_completed
         FROM client_events
         WHERE client_id = ?1
         ORDER BY for_date DESC
         LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![client_id, limit], map_row_to_event)?;
    let mut events = Vec::new();
    for row in rows {
        events.push(row?);
    }
    Ok(events)
}

/// Returns a client's upcoming appointments: future, not yet completed,
/// ascending by scheduled date.
pub fn upcoming_appointments(
    conn: &Connection,
    client_id: i64,
) -> Result<Vec<ClientEvent>, DirectoryError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, comment, for_date, is_completed
         FROM client_events
         WHERE client_id = ?1
           AND is_completed = 0
           AND datetime(for_date) > datetime('now')
         ORDER BY for_date ASC",
    )?;
    let rows = stmt.query_map([client_id], map_row_to_event)?;
    let mut events = Vec::new();
    for row in rows {
        events.push(row?);
    }
    Ok(events)
}
