//! Call journal and agent-action audit trail for the ARIA platform.
//!
//! Every handled call gets one `call_journal` row (opened at call start,
//! finalised at call end) and an append-only stream of `agent_actions`
//! rows recording each tool invocation and its result. Feedback notes and
//! post-call evaluation scores land in the same store. The companion
//! analytics dashboard reads all of it through the query helpers here;
//! the agent core only ever writes.
//!
//! Audit writes are fire-and-forget from the agent's perspective: a
//! failed audit insert is logged and the conversation continues. The
//! helpers in this crate return `Result` so the *caller* decides to
//! degrade; see `aria-tools`.

mod action;
mod error;
mod store;

pub use action::{ActionKind, AgentAction, CallRecord, ParseActionKindError};
pub use error::ObserveError;
pub use store::{
    actions_for_call, finish_call, get_call, get_call_by_room, kpis, list_calls, open_call,
    record_action, record_call_evaluation, record_feedback, set_call_client, CallEnd,
    DashboardKpis, ToolUsage,
};

#[cfg(test)]
mod tests;
