//! Agent call lifecycle handlers, driven by the voice worker: call
//! start, tool dispatch, call end, and the post-call evaluation sink.

use crate::{error::ApiError, AppState, WELCOME_MESSAGE};
use aria_observe::CallEnd;
use aria_tools::{dispatch, tool_specs, ToolSpec};
use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Runs blocking database work on a pooled connection.
async fn blocking_db<T, E, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&rusqlite::Connection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(ApiError::pool)?;
        f(&conn).map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await
    .map_err(ApiError::join)?
}

/// Handler for `GET /api/agent/tools`.
pub async fn list_tools_handler() -> Json<Vec<ToolSpec>> {
    Json(tool_specs())
}

/// Request body for call start.
#[derive(Debug, Deserialize)]
pub struct StartCallRequest {
    /// Room id of the call; generated when absent (test and outbound
    /// calls).
    pub room_id: Option<String>,
    /// Caller number from the SIP bridge, used for the proactive lookup.
    pub caller_number: Option<String>,
}

/// Response body for call start.
#[derive(Debug, Serialize, Deserialize)]
pub struct StartCallResponse {
    pub call_id: String,
    pub journal_id: i64,
    /// What the agent says first. When the caller's number matched a
    /// single file, this is already the confirmation question.
    pub greeting: String,
}

/// Handler for `POST /api/agent/calls`.
pub async fn start_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<StartCallRequest>,
) -> Result<Json<StartCallResponse>, ApiError> {
    let call_id = payload
        .room_id
        .unwrap_or_else(|| format!("call-{}", uuid::Uuid::new_v4()));

    let journal_id = {
        let call_id = call_id.clone();
        let caller_number = payload.caller_number.clone();
        blocking_db(&state, move |conn| {
            aria_observe::open_call(conn, &call_id, caller_number.as_deref())
        })
        .await?
    };

    let session = state.sessions.create(&call_id);
    {
        let mut session = session.lock().await;
        session.set_journal_id(journal_id);
        if let Some(number) = &payload.caller_number {
            session.set_caller_number(number.clone());
        }
    }

    tracing::info!(%call_id, journal_id, "call started");

    // Proactive lookup by caller number: when it matches a single file,
    // the greeting is the confirmation question itself.
    let mut greeting = WELCOME_MESSAGE.to_string();
    if let Some(number) = &payload.caller_number {
        let lookup = dispatch(
            &state.tools,
            &session,
            "lookup_client_by_phone",
            &json!({ "phone": number }),
        )
        .await;
        if lookup.contains("J'ai trouvé un dossier pour") {
            tracing::info!(%call_id, "caller pre-identified by phone number");
            greeting = lookup;
        }
    }

    Ok(Json(StartCallResponse {
        call_id,
        journal_id,
        greeting,
    }))
}

/// Request body for a tool invocation.
#[derive(Debug, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Response body for a tool invocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCallResponse {
    /// The agent's spoken response.
    pub response: String,
}

/// Handler for `POST /api/agent/calls/:callId/tool`.
pub async fn tool_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(call_id): Path<String>,
    Json(payload): Json<ToolCallRequest>,
) -> Result<Json<ToolCallResponse>, ApiError> {
    let session = state
        .sessions
        .get(&call_id)
        .ok_or_else(|| ApiError::NotFound(format!("no live call: {call_id}")))?;

    let response = dispatch(&state.tools, &session, &payload.name, &payload.arguments).await;
    Ok(Json(ToolCallResponse { response }))
}

/// Request body for call end.
#[derive(Debug, Deserialize, Default)]
pub struct EndCallRequest {
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
}

/// Handler for `POST /api/agent/calls/:callId/end`.
///
/// Finalises the journal row and discards the session (and with it any
/// identity state).
pub async fn end_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(call_id): Path<String>,
    Json(payload): Json<EndCallRequest>,
) -> Result<Json<Value>, ApiError> {
    let session = state
        .sessions
        .remove(&call_id)
        .ok_or_else(|| ApiError::NotFound(format!("no live call: {call_id}")))?;

    let journal_id = session.lock().await.journal_id();
    let mut finalised = false;
    if let Some(journal_id) = journal_id {
        let end = CallEnd {
            transcript: payload.transcript,
            summary: payload.summary,
            status: payload.status,
        };
        finalised =
            blocking_db(&state, move |conn| {
                aria_observe::finish_call(conn, journal_id, &end)
            })
            .await?;
    }

    tracing::info!(%call_id, finalised, "call ended, session discarded");
    Ok(Json(json!({ "ended": true, "finalised": finalised })))
}

/// Request body for the post-call evaluation sink.
#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub summary: String,
    pub compliance: String,
    pub resolution: String,
}

/// Handler for `POST /api/agent/calls/:callId/evaluation`.
///
/// The evaluation itself is produced by an external job; this endpoint
/// only records its output against the journal row.
pub async fn record_evaluation_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(call_id): Path<String>,
    Json(payload): Json<EvaluationRequest>,
) -> Result<Json<Value>, ApiError> {
    let recorded = blocking_db(&state, move |conn| {
        let Some(call) = aria_observe::get_call_by_room(conn, &call_id)? else {
            return Ok(None);
        };
        aria_observe::record_call_evaluation(
            conn,
            call.id,
            &payload.summary,
            &payload.compliance,
            &payload.resolution,
        )
        .map(Some)
    })
    .await?;

    match recorded {
        Some(recorded) => Ok(Json(json!({ "recorded": recorded }))),
        None => Err(ApiError::NotFound("unknown call".to_string())),
    }
}
