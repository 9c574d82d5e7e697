//! Tool specifications exposed to the conversation loop.
//!
//! The LLM pipeline receives this list as its callable surface; names
//! here are the names [`crate::dispatch`] routes on.

use serde::{Deserialize, Serialize};

/// Specification of one callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// Whether the tool requires a confirmed identity.
    pub gated: bool,
    pub parameters: Vec<ToolParameter>,
}

/// A parameter of a callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub param_type: String,
    pub required: bool,
}

fn param(name: &str, description: &str, param_type: &str, required: bool) -> ToolParameter {
    ToolParameter {
        name: name.into(),
        description: description.into(),
        param_type: param_type.into(),
        required,
    }
}

fn spec(name: &str, description: &str, gated: bool, parameters: Vec<ToolParameter>) -> ToolSpec {
    ToolSpec {
        name: name.into(),
        description: description.into(),
        gated,
        parameters,
    }
}

/// Returns every tool the agent can invoke.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        // Identification
        spec(
            "lookup_client_by_email",
            "Looks up a client by email address to start the identification process.",
            false,
            vec![param("email", "Client email address", "string", true)],
        ),
        spec(
            "lookup_client_by_phone",
            "Looks up a client by phone number. Intended for the automatic lookup at call start.",
            false,
            vec![param("phone", "Caller phone number", "string", true)],
        ),
        spec(
            "lookup_client_by_fullname",
            "Looks up a client by full name to start the identification process.",
            false,
            vec![
                param("last_name", "Client last name", "string", true),
                param("first_name", "Client first name", "string", true),
            ],
        ),
        spec(
            "confirm_identity",
            "Confirms or denies the identity of the candidate found by a lookup tool. \
             MUST be called after a lookup found a potential client.",
            false,
            vec![param(
                "confirmation",
                "true if the caller confirms being the candidate",
                "boolean",
                true,
            )],
        ),
        spec(
            "clear_context",
            "Clears the currently selected client from the assistant's context. Use when \
             the wrong person was identified or to end a client interaction.",
            false,
            vec![],
        ),
        // Client file
        spec(
            "get_client_details",
            "Gets the personal details of the currently confirmed client.",
            true,
            vec![],
        ),
        spec(
            "update_contact_information",
            "Updates the contact information of the currently confirmed client.",
            true,
            vec![
                param("address", "New postal address", "string", false),
                param("postal_code", "New postal code", "string", false),
                param("city", "New city", "string", false),
                param("phone", "New phone number", "string", false),
                param("email", "New email address", "string", false),
            ],
        ),
        // Contracts
        spec(
            "list_client_contracts",
            "Lists all contracts associated with the currently confirmed client.",
            true,
            vec![],
        ),
        spec(
            "get_contract_details",
            "Gets status and dates for one of the confirmed client's contracts.",
            true,
            vec![param(
                "contract_reference",
                "Contract reference, e.g. CONTRAT-A",
                "string",
                true,
            )],
        ),
        spec(
            "get_contract_company_info",
            "Names the insurance company managing one of the confirmed client's contracts.",
            true,
            vec![param(
                "contract_reference",
                "Contract reference",
                "string",
                true,
            )],
        ),
        spec(
            "get_contract_formula_details",
            "Describes the coverage formula of one of the confirmed client's contracts.",
            true,
            vec![param(
                "contract_reference",
                "Contract reference",
                "string",
                true,
            )],
        ),
        // History
        spec(
            "get_client_interaction_history",
            "Summarises the confirmed client's recent interactions.",
            true,
            vec![],
        ),
        spec(
            "check_upcoming_appointments",
            "Lists the confirmed client's upcoming appointments.",
            true,
            vec![],
        ),
        spec(
            "summarize_advisory_duty",
            "Reads back the advisory-duty record captured at subscription time.",
            true,
            vec![],
        ),
        // Communication
        spec(
            "send_confirmation_email",
            "Sends a confirmation email to the currently confirmed client.",
            true,
            vec![
                param("subject", "Email subject", "string", true),
                param("body", "Email body; newlines allowed", "string", true),
            ],
        ),
        spec(
            "schedule_callback",
            "Schedules an advisor callback for the confirmed client. datetime_str MUST be \
             ISO 8601 ('YYYY-MM-DDTHH:MM:SS'); convert natural-language times first.",
            true,
            vec![
                param("reason", "Reason for the callback", "string", true),
                param(
                    "datetime_str",
                    "Callback slot start, ISO 8601",
                    "string",
                    true,
                ),
            ],
        ),
        spec(
            "find_employee_for_escalation",
            "Finds an active employee to escalate the call to. Does not require a \
             confirmed identity.",
            false,
            vec![
                param("name", "Employee name fragment", "string", false),
                param("function", "Employee function, e.g. Support", "string", false),
            ],
        ),
        spec(
            "record_call_feedback",
            "Records the caller's satisfaction note (1-5) at the end of the call.",
            false,
            vec![
                param("note", "Satisfaction note from 1 to 5", "integer", true),
                param("comment", "Optional free-form comment", "string", false),
            ],
        ),
    ]
}
