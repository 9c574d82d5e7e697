//! Advisory-duty record retrieval.

use aria_types::AdvisoryDuty;
use rusqlite::{Connection, OptionalExtension};

use crate::DirectoryError;

/// Retrieves the advisory-duty record for a client, if one was captured.
pub fn advisory_duty_for_client(
    conn: &Connection,
    client_id: i64,
) -> Result<Option<AdvisoryDuty>, DirectoryError> {
    Ok(conn
        .query_row(
            "SELECT id, client_id, client_situation, budget, need1, need2, need3
             FROM advisory_duties WHERE client_id = ?1",
            [client_id],
            |row| {
                Ok(AdvisoryDuty {
                    id: row.get(0)?,
                    client_id: row.get(1)?,
                    client_situation: row.get(2)?,
                    budget: row.get(3)?,
                    need1: row.get(4)?,
                    need2: row.get(5)?,
                    need3: row.get(6)?,
                })
            },
        )
        .optional()?)
}
