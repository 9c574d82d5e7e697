//! Shared domain types for the ARIA voice-agent platform.
//!
//! This crate provides the record types used across all ARIA crates:
//! client files, contracts and their companies/formulas, employees,
//! client event history, and advisory-duty records.
//!
//! No crate in the workspace depends on anything *except* `aria-types`
//! for cross-cutting type definitions. This keeps the dependency graph
//! clean and prevents circular dependencies.

use serde::{Deserialize, Serialize};

/// A client file from the customer store.
///
/// The identity key is `id`; contact fields are the only mutable part.
/// Records are created and maintained by the CRM; ARIA reads them and
/// performs a narrow contact-field update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Stable unique identifier.
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    /// Archived files are invisible to lookups.
    pub archived: bool,
}

impl Client {
    /// Returns "First Last" for spoken responses.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An insurance contract held by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: i64,
    /// Owning client (primary holder).
    pub client_id: i64,
    /// Unique human-facing contract reference (e.g. "CONTRAT-A").
    pub reference: String,
    /// Free-form status label, e.g. "Actif", "Résilié".
    pub status: String,
    pub company_id: i64,
    pub formula_id: i64,
    /// ISO 8601 date.
    pub start_date: String,
    /// ISO 8601 date; `None` while the contract is open-ended.
    pub end_date: Option<String>,
}

/// An insurance company managing contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub phone_number: Option<String>,
}

/// A coverage formula attached to contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Monthly base price in euro cents.
    pub monthly_price_cents: i64,
}

impl Formula {
    /// Renders the monthly price as "29,99 €" for spoken responses.
    pub fn monthly_price_display(&self) -> String {
        let euros = self.monthly_price_cents / 100;
        let cents = (self.monthly_price_cents % 100).abs();
        format!("{},{:02} €", euros, cents)
    }
}

/// A back-office employee, used for escalation routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee identifiers come from the HR system as opaque strings.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Role label, e.g. "Support", "Commercial".
    pub function: String,
    pub is_active: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An entry in a client's interaction history.
///
/// Rows with a future `for_date` and `is_completed == false` are the
/// client's upcoming appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientEvent {
    pub id: i64,
    pub client_id: i64,
    pub comment: String,
    /// ISO 8601 date-time the event is scheduled for (or happened at).
    pub for_date: String,
    pub is_completed: bool,
}

/// The advisory-duty record collected when a contract was sold.
///
/// Summarised back to the client on request, as required by the
/// insurance distribution directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryDuty {
    pub id: i64,
    pub client_id: i64,
    pub client_situation: Option<String>,
    pub budget: Option<String>,
    pub need1: Option<String>,
    pub need2: Option<String>,
    pub need3: Option<String>,
}

impl AdvisoryDuty {
    /// Returns the recorded needs in order, skipping empty slots.
    pub fn needs(&self) -> Vec<&str> {
        [&self.need1, &self.need2, &self.need3]
            .into_iter()
            .filter_map(|n| n.as_deref())
            .collect()
    }
}

/// The attribute a client lookup matched on.
///
/// Carried into the audit log so the dashboard can break identification
/// attempts down by channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookupSource {
    #[serde(rename = "EMAIL")]
    Email,
    #[serde(rename = "PHONE")]
    Phone,
    #[serde(rename = "FULLNAME")]
    FullName,
}

impl LookupSource {
    /// Returns the canonical string label for this source.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::FullName => "FULLNAME",
        }
    }
}

impl std::fmt::Display for LookupSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
