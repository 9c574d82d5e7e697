//! Per-call session state for the ARIA agent.
//!
//! The heart of this crate is the identity state machine: during a call
//! the agent may hold at most one *unconfirmed candidate* (a lookup hit
//! awaiting the caller's explicit confirmation) or one *confirmed
//! context* (the client file the agent is authorized to read and
//! mutate). Representing the two as a tagged union makes the illegal
//! combination, acting on a candidate that was never confirmed,
//! unrepresentable.
//!
//! Session state is in-process only. One call is owned by one worker; a
//! crash mid-call drops the call, and the durable record of what
//! happened is the audit trail, not this state.

mod registry;
mod state;

pub use registry::SessionRegistry;
pub use state::{CallSession, ConfirmOutcome, IdentityState, LookupDisposition};
