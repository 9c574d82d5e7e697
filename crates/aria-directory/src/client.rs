//! Client lookup and contact updates.

use aria_types::Client;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::DirectoryError;

const CLIENT_COLUMNS: &str =
    "id, first_name, last_name, email, phone, mobile, address, postal_code, city, archived";

pub(crate) fn map_row_to_client(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        mobile: row.get(5)?,
        address: row.get(6)?,
        postal_code: row.get(7)?,
        city: row.get(8)?,
        archived: row.get(9)?,
    })
}

/// Finds a client by exact email address. Archived files never match.
pub fn find_client_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Client>, DirectoryError> {
    let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE email = ?1 AND archived = 0");
    Ok(conn
        .query_row(&sql, [email], map_row_to_client)
        .optional()?)
}

/// Finds clients whose phone or mobile number ends with the given digits.
///
/// Suffix matching tolerates international prefixes: a caller presenting
/// as `+33612345678` still matches a stored `0612345678` when the query
/// uses the national significant digits.
pub fn find_clients_by_phone(
    conn: &Connection,
    phone: &str,
) -> Result<Vec<Client>, DirectoryError> {
    let sql = format!(
        "SELECT {CLIENT_COLUMNS} FROM clients
         WHERE (phone LIKE ?1 OR mobile LIKE ?1) AND archived = 0
         ORDER BY id ASC"
    );
    let pattern = format!("%{phone}");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([pattern], map_row_to_client)?;
    let mut clients = Vec::new();
    for row in rows {
        clients.push(row?);
    }
    Ok(clients)
}

/// Finds clients by exact last and first name.
pub fn find_clients_by_fullname(
    conn: &Connection,
    last_name: &str,
    first_name: &str,
) -> Result<Vec<Client>, DirectoryError> {
    let sql = format!(
        "SELECT {CLIENT_COLUMNS} FROM clients
         WHERE last_name = ?1 AND first_name = ?2 AND archived = 0
         ORDER BY id ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![last_name, first_name], map_row_to_client)?;
    let mut clients = Vec::new();
    for row in rows {
        clients.push(row?);
    }
    Ok(clients)
}

/// Retrieves a client by primary key, archived or not.
///
/// Used to refresh an already-confirmed context after a contact update,
/// so archival status is not re-checked here.
pub fn get_client(conn: &Connection, id: i64) -> Result<Option<Client>, DirectoryError> {
    let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row_to_client).optional()?)
}

/// Partial contact-field update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.postal_code.is_none()
            && self.city.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }
}

/// Updates a client's contact fields with a single atomic UPDATE built
/// from the `Some` fields of `update`.
///
/// Returns `false` when the update set is empty or no row was affected,
/// `true` when the row changed.
pub fn update_client_contact(
    conn: &Connection,
    client_id: i64,
    update: &ContactUpdate,
) -> Result<bool, DirectoryError> {
    let mut set_parts: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let mut idx = 1usize;

    let fields: [(&str, &Option<String>); 5] = [
        ("address", &update.address),
        ("postal_code", &update.postal_code),
        ("city", &update.city),
        ("phone", &update.phone),
        ("email", &update.email),
    ];
    for (column, value) in fields {
        if let Some(v) = value {
            set_parts.push(format!("{column} = ?{idx}"));
            values.push(Box::new(v.clone()));
            idx += 1;
        }
    }

    if set_parts.is_empty() {
        return Ok(false);
    }

    let sql = format!(
        "UPDATE clients SET {} WHERE id = ?{idx}",
        set_parts.join(", ")
    );
    values.push(Box::new(client_id));

    let params_refs: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| &**v).collect();
    let affected = conn.execute(&sql, params_refs.as_slice())?;
    Ok(affected > 0)
}
