//! Employee search for escalation routing.

use aria_types::Employee;
use rusqlite::{Connection, Row};

use crate::DirectoryError;

fn map_row_to_employee(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        function: row.get(3)?,
        is_active: row.get(4)?,
    })
}

/// Finds active employees, optionally filtered by name fragment and/or
/// function fragment. With no filters, returns every active employee.
pub fn find_active_employees(
    conn: &Connection,
    name: Option<&str>,
    function: Option<&str>,
) -> Result<Vec<Employee>, DirectoryError> {
    let mut clauses = vec!["is_active = 1".to_string()];
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let mut idx = 1usize;

    if let Some(name) = name {
        clauses.push(format!(
            "(first_name LIKE ?{idx} OR last_name LIKE ?{idx})"
        ));
        values.push(Box::new(format!("%{name}%")));
        idx += 1;
    }
    if let Some(function) = function {
        clauses.push(format!("function LIKE ?{idx}"));
        values.push(Box::new(format!("%{function}%")));
    }

    let sql = format!(
        "SELECT id, first_name, last_name, function, is_active
         FROM employees
         WHERE {}
         ORDER BY last_name ASC, first_name ASC",
        clauses.join(" AND ")
    );

    let params_refs: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| &**v).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), map_row_to_employee)?;
    let mut employees = Vec::new();
    for row in rows {
        employees.push(row?);
    }
    Ok(employees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::seeded_conn;

    #[test]
    fn finds_active_by_function() {
        let conn = seeded_conn();
        let support =
            find_active_employees(&conn, None, Some("Support")).expect("query should succeed");
        assert_eq!(support.len(), 1);
        assert_eq!(support[0].full_name(), "Alice Martin");
    }

    #[test]
    fn inactive_employees_never_match() {
        let conn = seeded_conn();
        let commercial =
            find_active_employees(&conn, None, Some("Commercial")).expect("query should succeed");
        assert!(commercial.is_empty(), "Bruno Petit is inactive");
    }

    #[test]
    fn name_fragment_matches_either_name() {
        let conn = seeded_conn();
        let by_last = find_active_employees(&conn, Some("Mart"), None).expect("query");
        assert_eq!(by_last.len(), 1);

        let by_first = find_active_employees(&conn, Some("Alice"), None).expect("query");
        assert_eq!(by_first.len(), 1);
    }
}
