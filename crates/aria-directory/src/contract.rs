//! Contracts and their companies and formulas.

use aria_types::{Company, Contract, Formula};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::DirectoryError;

const CONTRACT_COLUMNS: &str =
    "id, client_id, reference, status, company_id, formula_id, start_date, end_date";

fn map_row_to_contract(row: &Row<'_>) -> rusqlite::Result<Contract> {
    Ok(Contract {
        id: row.get(0)?,
        client_id: row.get(1)?,
        reference: row.get(2)?,
        status: row.get(3)?,
        company_id: row.get(4)?,
        formula_id: row.get(5)?,
        start_date: row.get(6)?,
        end_date: row.get(7)?,
    })
}

/// Lists all contracts held by a client, oldest first.
pub fn contracts_for_client(
    conn: &Connection,
    client_id: i64,
) -> Result<Vec<Contract>, DirectoryError> {
    let sql = format!(
        "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE client_id = ?1 ORDER BY start_date ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([client_id], map_row_to_contract)?;
    let mut contracts = Vec::new();
    for row in rows {
        contracts.push(row?);
    }
    Ok(contracts)
}

/// Retrieves a contract by its human-facing reference.
pub fn contract_by_reference(
    conn: &Connection,
    reference: &str,
) -> Result<Option<Contract>, DirectoryError> {
    let sql = format!("SELECT {CONTRACT_COLUMNS} FROM contracts WHERE reference = ?1");
    Ok(conn
        .query_row(&sql, [reference], map_row_to_contract)
        .optional()?)
}

/// Retrieves the company managing a contract.
pub fn get_company(conn: &Connection, id: i64) -> Result<Option<Company>, DirectoryError> {
    Ok(conn
        .query_row(
            "SELECT id, name, phone_number FROM companies WHERE id = ?1",
            [id],
            |row| {
                Ok(Company {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    phone_number: row.get(2)?,
                })
            },
        )
        .optional()?)
}

/// Retrieves the coverage formula a contract is based on.
pub fn get_formula(conn: &Connection, id: i64) -> Result<Option<Formula>, DirectoryError> {
    Ok(conn
        .query_row(
            "SELECT id, name, description, monthly_price_cents FROM formulas WHERE id = ?1",
            [id],
            |row| {
                Ok(Formula {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    monthly_price_cents: row.get(3)?,
                })
            },
        )
        .optional()?)
}
