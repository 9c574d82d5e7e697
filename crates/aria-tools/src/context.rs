//! Shared context handed to every tool handler.

use std::sync::Arc;

use aria_db::DbPool;
use aria_notify::{CalendarTransport, Notifier};
use aria_observe::ActionKind;
use thiserror::Error;

/// Internal failures a tool handler can hit before it turns them into a
/// spoken response. Never crosses the dispatch boundary.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("database connection failed: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Directory(#[from] aria_directory::DirectoryError),

    #[error(transparent)]
    Observe(#[from] aria_observe::ObserveError),
}

/// Collaborators available to tool handlers.
///
/// The session itself is *not* here: dispatch locks it per invocation
/// and hands handlers a `&mut CallSession`, so a handler can never race
/// another invocation of the same call.
#[derive(Clone)]
pub struct ToolContext {
    pool: DbPool,
    notifier: Notifier,
    calendar: Arc<dyn CalendarTransport>,
}

impl ToolContext {
    pub fn new(pool: DbPool, notifier: Notifier, calendar: Arc<dyn CalendarTransport>) -> Self {
        Self {
            pool,
            notifier,
            calendar,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn calendar(&self) -> &dyn CalendarTransport {
        &*self.calendar
    }

    /// Runs blocking database work on a pooled connection from a
    /// `spawn_blocking` task.
    pub(crate) async fn with_conn<T, E, F>(&self, f: F) -> Result<T, ToolError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ToolError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<T, ToolError> {
            let conn = pool.get()?;
            f(&conn).map_err(Into::into)
        })
        .await?
    }

    /// Appends an audit record for the current call, fire-and-forget: a
    /// failed audit write is logged and swallowed so it can never break
    /// the conversation.
    pub(crate) async fn audit(
        &self,
        journal_id: Option<i64>,
        kind: ActionKind,
        tool_name: &str,
        params: Option<serde_json::Value>,
        result: Option<String>,
    ) {
        let Some(journal_id) = journal_id else {
            return;
        };
        let tool_name = tool_name.to_string();

        let write = self
            .with_conn(move |conn| {
                aria_observe::record_action(
                    conn,
                    journal_id,
                    kind,
                    Some(&tool_name),
                    params.as_ref(),
                    result.as_deref(),
                    None,
                )
            })
            .await;

        if let Err(e) = write {
            tracing::warn!(journal_id, kind = %kind, "audit write failed: {e}");
        }
    }
}
