//! Data-access layer over the ARTEX extranet customer store.
//!
//! Every query the agent can make against client data goes through this
//! crate: client lookup and contact updates, contracts with their
//! companies and formulas, employees, interaction history, and
//! advisory-duty records.
//!
//! All functions operate on a borrowed [`rusqlite::Connection`] so callers
//! control pooling and transactions. None of them enforce the identity
//! gate (that is the tool layer's job); this crate is a plain collaborator
//! that answers by primary key or exact attribute match.

use thiserror::Error;

mod advisory;
mod client;
mod contract;
mod employee;
mod event;

pub use advisory::advisory_duty_for_client;
pub use client::{
    find_client_by_email, find_clients_by_fullname, find_clients_by_phone, get_client,
    update_client_contact, ContactUpdate,
};
pub use contract::{contract_by_reference, contracts_for_client, get_company, get_formula};
pub use employee::find_active_employees;
pub use event::{client_history, upcoming_appointments};

/// Errors that can occur during directory operations.
///
/// "Not found" is not an error here: lookups return `Option`/`Vec` and
/// the caller decides what an empty result means.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[cfg(test)]
pub(crate) mod testutil {
    use rusqlite::Connection;

    /// Opens an in-memory database with the full schema and the canonical
    /// fixtures used across the directory tests.
    pub fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        aria_db::run_migrations(&conn).expect("run migrations");
        conn.execute_batch(
            "INSERT INTO clients (id, first_name, last_name, email, phone, mobile, address, postal_code, city, archived) VALUES
                (1, 'Jean', 'Dupont', 'jean.dupont@email.com', '0123456789', NULL, '1 rue de la Paix', '75001', 'Paris', 0),
                (2, 'Marie', 'Durand', 'marie.durand@email.com', '0987654321', '0611223344', NULL, NULL, 'Lyon', 0),
                (3, 'Paul', 'Dupont', 'paul.dupont@email.com', '0555555555', NULL, NULL, NULL, NULL, 0),
                (4, 'Ancien', 'Client', 'ancien.client@email.com', '0444444444', NULL, NULL, NULL, NULL, 1);
             INSERT INTO companies (id, name, phone_number) VALUES
                (1, 'Assurance Alpha', '111-222-3333'),
                (2, 'Garantie Gamma', '444-555-6666');
             INSERT INTO formulas (id, name, description, monthly_price_cents) VALUES
                (1, 'Formule Essentielle', 'Couverture de base.', 2999),
                (2, 'Formule Pro', 'Couverture complète pour les professionnels.', 7999);
             INSERT INTO contracts (id, client_id, reference, status, company_id, formula_id, start_date) VALUES
                (101, 1, 'CONTRAT-A', 'Actif', 1, 1, '2022-01-01'),
                (102, 2, 'CONTRAT-B', 'Actif', 2, 2, '2023-06-15');
             INSERT INTO employees (id, first_name, last_name, function, is_active) VALUES
                ('emp-1', 'Alice', 'Martin', 'Support', 1),
                ('emp-2', 'Bruno', 'Petit', 'Commercial', 0);
             INSERT INTO client_events (id, client_id, comment, for_date, is_completed) VALUES
                (1001, 1, 'Premier contact', '2023-01-15T10:00:00', 1);
             INSERT INTO advisory_duties (id, client_id, client_situation, budget, need1) VALUES
                (1, 1, 'Recherche une assurance santé.', '50€/mois', 'Soins dentaires');",
        )
        .expect("seed fixtures");
        conn
    }
}
