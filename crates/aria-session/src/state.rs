//! The identity state machine and the per-call session that owns it.

use aria_types::Client;
use serde::{Deserialize, Serialize};

/// Identity state of a call.
///
/// Exactly one of three states holds at any time:
///
/// - `NoCandidate`: nothing looked up, or the last candidate was denied
///   or cleared;
/// - `PendingConfirmation`: a lookup found exactly one file and the
///   agent is waiting for the caller to confirm it is theirs;
/// - `Confirmed`: the caller confirmed; gated tools may operate on this
///   client and no other.
///
/// Tools that require identity read only the `Confirmed` payload. A
/// pending candidate authorizes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IdentityState {
    #[default]
    NoCandidate,
    PendingConfirmation(Client),
    Confirmed(Client),
}

/// What a lookup result did to the session, as observed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupDisposition {
    /// No file matched; any pending candidate was dropped.
    NotFound,
    /// Exactly one file matched and is now the pending candidate.
    Single(Client),
    /// Several files matched; identity state was left untouched and the
    /// caller must disambiguate.
    Multiple(usize),
}

/// Outcome of a confirmation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// No candidate was pending; the state is unchanged.
    NothingPending,
    /// The caller confirmed; the client is now the confirmed context.
    Confirmed(Client),
    /// The caller denied; the candidate was dropped and nothing is
    /// confirmed.
    Denied,
}

/// State owned by a single call, created at call start and discarded at
/// call end.
#[derive(Debug, Clone)]
pub struct CallSession {
    call_id: String,
    journal_id: Option<i64>,
    caller_number: Option<String>,
    identity: IdentityState,
}

impl CallSession {
    /// Creates an empty session for a call. Identity starts at
    /// [`IdentityState::NoCandidate`].
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            journal_id: None,
            caller_number: None,
            identity: IdentityState::NoCandidate,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// The call-journal row backing this call's audit trail, once opened.
    pub fn journal_id(&self) -> Option<i64> {
        self.journal_id
    }

    pub fn set_journal_id(&mut self, journal_id: i64) {
        self.journal_id = Some(journal_id);
    }

    pub fn caller_number(&self) -> Option<&str> {
        self.caller_number.as_deref()
    }

    pub fn set_caller_number(&mut self, number: impl Into<String>) {
        self.caller_number = Some(number.into());
    }

    pub fn identity(&self) -> &IdentityState {
        &self.identity
    }

    /// The confirmed client, if the gate is open. This is the only
    /// accessor gated tools may use to obtain a client id.
    pub fn confirmed(&self) -> Option<&Client> {
        match &self.identity {
            IdentityState::Confirmed(client) => Some(client),
            _ => None,
        }
    }

    /// The candidate awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&Client> {
        match &self.identity {
            IdentityState::PendingConfirmation(client) => Some(client),
            _ => None,
        }
    }

    /// Applies a lookup result to the session.
    ///
    /// - zero matches drop any pending candidate;
    /// - exactly one match becomes the pending candidate, idempotently
    ///   overwriting a previous one (a new lookup supersedes a confirmed
    ///   context too, since starting a fresh identification closes the gate);
    /// - several matches leave the state untouched.
    pub fn apply_lookup(&mut self, mut matches: Vec<Client>) -> LookupDisposition {
        match matches.len() {
            0 => {
                if matches!(self.identity, IdentityState::PendingConfirmation(_)) {
                    self.identity = IdentityState::NoCandidate;
                }
                LookupDisposition::NotFound
            }
            1 => {
                let client = matches.remove(0);
                self.identity = IdentityState::PendingConfirmation(client.clone());
                LookupDisposition::Single(client)
            }
            n => LookupDisposition::Multiple(n),
        }
    }

    /// Resolves a pending confirmation.
    ///
    /// With no pending candidate this is a no-op reported as
    /// [`ConfirmOutcome::NothingPending`]; confirming out of order never
    /// silently succeeds.
    pub fn confirm(&mut self, accepted: bool) -> ConfirmOutcome {
        let IdentityState::PendingConfirmation(candidate) = &self.identity else {
            return ConfirmOutcome::NothingPending;
        };
        let candidate = candidate.clone();

        if accepted {
            self.identity = IdentityState::Confirmed(candidate.clone());
            ConfirmOutcome::Confirmed(candidate)
        } else {
            self.identity = IdentityState::NoCandidate;
            ConfirmOutcome::Denied
        }
    }

    /// Replaces the confirmed context with a freshly-read record after a
    /// successful mutation, so later reads in the same call see current
    /// data.
    ///
    /// Ignored (returning `false`) unless the gate is open for the same
    /// client id: a refresh can never switch identities.
    pub fn refresh_confirmed(&mut self, client: Client) -> bool {
        match &self.identity {
            IdentityState::Confirmed(current) if current.id == client.id => {
                self.identity = IdentityState::Confirmed(client);
                true
            }
            _ => false,
        }
    }

    /// Unconditionally resets identity to [`IdentityState::NoCandidate`].
    /// Idempotent; used as security hygiene between callers sharing one
    /// session.
    pub fn clear(&mut self) {
        self.identity = IdentityState::NoCandidate;
    }
}
