//! In-process registry of live call sessions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::CallSession;

/// Live sessions keyed by call id (the LiveKit room name).
///
/// The outer `std::sync::RwLock` guards brief HashMap operations
/// (get/insert/remove) that never span `.await` points. Each session sits
/// behind a `tokio::sync::Mutex` because a tool invocation holds it across
/// database awaits; this serializes tool calls per call, which is the
/// intended ordering model.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<tokio::sync::Mutex<CallSession>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a fresh session for a call, replacing any
    /// stale session under the same call id.
    pub fn create(&self, call_id: &str) -> Arc<tokio::sync::Mutex<CallSession>> {
        let session = Arc::new(tokio::sync::Mutex::new(CallSession::new(call_id)));
        let mut map = self.inner.write().expect("session registry lock poisoned");
        if map.insert(call_id.to_string(), session.clone()).is_some() {
            tracing::warn!(call_id, "replaced stale session for call id");
        }
        session
    }

    /// Looks up the live session for a call.
    pub fn get(&self, call_id: &str) -> Option<Arc<tokio::sync::Mutex<CallSession>>> {
        self.inner
            .read()
            .expect("session registry lock poisoned")
            .get(call_id)
            .cloned()
    }

    /// Removes a call's session, discarding its identity state.
    pub fn remove(&self, call_id: &str) -> Option<Arc<tokio::sync::Mutex<CallSession>>> {
        self.inner
            .write()
            .expect("session registry lock poisoned")
            .remove(call_id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .expect("session registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
