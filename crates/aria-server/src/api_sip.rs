//! Inbound SIP webhook: turns a LiveKit SIP call event into room routing
//! instructions.

use crate::{error::ApiError, AppState};
use aria_voice::{inbound_room_name, participant_metadata};
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Webhook payload posted by LiveKit for each incoming SIP call.
#[derive(Debug, Deserialize)]
pub struct InboundSipRequest {
    /// Platform call id.
    pub call_id: String,
    /// Caller number (E.164).
    pub from: String,
    /// Dialled number.
    pub to: String,
}

/// Routing instructions returned to LiveKit. The platform creates the
/// participant token itself from these details.
#[derive(Debug, Serialize, Deserialize)]
pub struct InboundSipResponse {
    pub room_name: String,
    pub participant_identity: String,
    pub participant_name: String,
    pub participant_metadata: String,
}

/// Handler for `POST /inbound-sip`.
pub async fn inbound_sip_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<InboundSipRequest>,
) -> Result<Json<InboundSipResponse>, ApiError> {
    if payload.call_id.is_empty() || payload.from.is_empty() || payload.to.is_empty() {
        return Err(ApiError::BadRequest(
            "missing required fields (call_id, from, to)".to_string(),
        ));
    }

    tracing::info!(
        call_id = %payload.call_id,
        from = %payload.from,
        to = %payload.to,
        "inbound SIP call"
    );

    let room_name = inbound_room_name(&payload.call_id);

    if state.room_service.is_enabled() {
        state
            .room_service
            .create_room(&room_name)
            .await
            .map_err(|e| ApiError::BadGateway(format!("room creation failed: {e}")))?;
        tracing::info!(room = %room_name, "created LiveKit room");
    } else {
        // Local development and tests run without LiveKit credentials;
        // the routing instructions are still returned.
        tracing::warn!(room = %room_name, "LiveKit disabled, skipping room creation");
    }

    Ok(Json(InboundSipResponse {
        room_name,
        participant_identity: format!("sip-user-{}", payload.from),
        participant_name: format!("Caller ({})", payload.from),
        participant_metadata: participant_metadata(&payload.from),
    }))
}
