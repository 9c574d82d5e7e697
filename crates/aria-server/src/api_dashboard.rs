//! Dashboard read API: KPIs, paginated call list, call detail with its
//! action trail. Strictly read-only.

use crate::{error::ApiError, AppState};
use aria_observe::{AgentAction, CallRecord, DashboardKpis};
use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

async fn blocking_db<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&rusqlite::Connection) -> Result<T, aria_observe::ObserveError> + Send + 'static,
    T: Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(ApiError::pool)?;
        f(&conn).map_err(|e| ApiError::InternalServerError(e.to_string()))
    })
    .await
    .map_err(ApiError::join)?
}

/// Handler for `GET /api/dashboard/kpis`.
pub async fn kpis_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<DashboardKpis>, ApiError> {
    let kpis = blocking_db(&state, aria_observe::kpis).await?;
    Ok(Json(kpis))
}

/// Pagination query for the call list.
#[derive(Debug, Deserialize)]
pub struct CallListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// Handler for `GET /api/dashboard/calls`.
pub async fn list_calls_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<CallListQuery>,
) -> Result<Json<Vec<CallRecord>>, ApiError> {
    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);

    let calls = blocking_db(&state, move |conn| {
        aria_observe::list_calls(conn, limit, offset)
    })
    .await?;
    Ok(Json(calls))
}

/// Response body for call detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct CallDetailResponse {
    pub call: CallRecord,
    pub actions: Vec<AgentAction>,
}

/// Handler for `GET /api/dashboard/calls/:journalId`.
pub async fn call_detail_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(journal_id): Path<i64>,
) -> Result<Json<CallDetailResponse>, ApiError> {
    let detail = blocking_db(&state, move |conn| {
        let Some(call) = aria_observe::get_call(conn, journal_id)? else {
            return Ok(None);
        };
        let actions = aria_observe::actions_for_call(conn, journal_id)?;
        Ok(Some(CallDetailResponse { call, actions }))
    })
    .await?;

    match detail {
        Some(detail) => Ok(Json(detail)),
        None => Err(ApiError::NotFound(format!("unknown call: {journal_id}"))),
    }
}
