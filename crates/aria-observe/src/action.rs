//! Record types for the call journal and action log.

use serde::{Deserialize, Serialize};

/// Kinds of agent actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// A tool was invoked (parameters recorded).
    #[serde(rename = "TOOL_CALL")]
    ToolCall,
    /// A tool returned (response text recorded).
    #[serde(rename = "TOOL_RESULT")]
    ToolResult,
    /// The agent spoke a message outside any tool flow.
    #[serde(rename = "AGENT_SAY")]
    AgentSay,
    /// A lifecycle event (call connected, session cleared, ...).
    #[serde(rename = "SYSTEM_EVENT")]
    SystemEvent,
}

impl ActionKind {
    /// Returns the canonical string label for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToolCall => "TOOL_CALL",
            Self::ToolResult => "TOOL_RESULT",
            Self::AgentSay => "AGENT_SAY",
            Self::SystemEvent => "SYSTEM_EVENT",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = ParseActionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TOOL_CALL" => Ok(Self::ToolCall),
            "TOOL_RESULT" => Ok(Self::ToolResult),
            "AGENT_SAY" => Ok(Self::AgentSay),
            "SYSTEM_EVENT" => Ok(Self::SystemEvent),
            _ => Err(ParseActionKindError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown action kind string.
#[derive(Debug, Clone)]
pub struct ParseActionKindError(pub String);

impl std::fmt::Display for ParseActionKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown action kind: {}", self.0)
    }
}

impl std::error::Error for ParseActionKindError {}

/// A single row from the `agent_actions` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentAction {
    /// Auto-incremented row ID.
    pub id: i64,
    /// The call-journal row this action belongs to.
    pub journal_id: i64,
    /// ISO 8601 timestamp of when the action occurred.
    pub occurred_at: String,
    /// The action kind label (e.g. `TOOL_CALL`).
    pub kind: String,
    /// Tool name for tool actions.
    pub tool_name: Option<String>,
    /// JSON-encoded tool parameters.
    pub params_json: Option<String>,
    /// Tool response text.
    pub result: Option<String>,
    /// Free-form event detail.
    pub detail: Option<String>,
}

/// A single row from the `call_journal` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: i64,
    /// The LiveKit room name for the call.
    pub room_id: String,
    pub caller_number: Option<String>,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub duration_seconds: Option<i64>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    /// Call status label, e.g. "En cours", "Terminé", "Échec".
    pub status: String,
    /// The confirmed client for the call, once identity was confirmed.
    pub client_id: Option<i64>,
    /// Compliance assessment written by the post-call evaluation job.
    pub compliance_evaluation: Option<String>,
    /// Resolution assessment written by the post-call evaluation job.
    pub resolution_evaluation: Option<String>,
}
