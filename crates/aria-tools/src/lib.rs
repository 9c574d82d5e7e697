//! The callable tool layer of the ARIA agent.
//!
//! The conversation loop (the voice platform's LLM pipeline) decides
//! *which* tool to invoke; this crate implements the tools themselves and
//! the one security boundary of the system: every tool that reads or
//! mutates client data requires a confirmed identity in the call session
//! and fails closed with a fixed refusal otherwise.
//!
//! Tools never return errors to the conversation loop. Every outcome
//! (success, refusal, lookup miss, provider outage) is a natural-language
//! response that keeps the call going. Failures of best-effort side
//! actions (appointment enrichment, email, calendar) degrade to fallback
//! phrasing and never touch identity state.
//!
//! Dispatch is name-indexed: [`tool_specs`] enumerates the capability
//! surface for the LLM, [`dispatch`] routes an invocation to its handler
//! and wraps it in `TOOL_CALL`/`TOOL_RESULT` audit records.

mod client;
mod comms;
mod context;
mod contracts;
mod dispatch;
mod history;
mod identity;
mod spec;

pub use context::{ToolContext, ToolError};
pub use dispatch::dispatch;
pub use spec::{tool_specs, ToolParameter, ToolSpec};
