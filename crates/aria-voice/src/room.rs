//! Room creation and join tokens for inbound SIP calls.

use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{CreateRoomOptions, RoomClient};
use livekit_protocol::Room;
use std::time::Duration;

/// Room name for an inbound SIP call, derived from the platform call id.
pub fn inbound_room_name(call_id: &str) -> String {
    format!("sip-inbound-{call_id}")
}

/// Participant metadata carried into the room so the agent worker can
/// run its proactive phone lookup at call start.
pub fn participant_metadata(caller_number: &str) -> String {
    serde_json::json!({ "caller_number": caller_number }).to_string()
}

/// Server-side LiveKit room operations.
#[derive(Debug)]
pub struct RoomService {
    config: LiveKitConfig,
    room_client: RoomClient,
}

impl RoomService {
    pub fn new(config: LiveKitConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
        }
    }

    /// Whether LiveKit credentials are configured at all. Disabled in
    /// local development and in tests.
    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    pub fn get_url(&self) -> &str {
        &self.config.url
    }

    /// Creates the room an inbound call will be routed into.
    pub async fn create_room(&self, name: &str) -> Result<Room, VoiceError> {
        if !self.is_enabled() {
            return Err(VoiceError::Config(
                "LiveKit is not configured".to_string(),
            ));
        }

        let options = CreateRoomOptions::default();
        self.room_client
            .create_room(name, options)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    /// Generates a join token for a participant of a call room.
    pub fn generate_join_token(
        &self,
        room_name: &str,
        participant_identity: &str,
        participant_name: &str,
    ) -> Result<String, VoiceError> {
        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(participant_identity)
            .with_name(participant_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(VoiceError::LiveKit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_room_names_are_stable() {
        assert_eq!(inbound_room_name("abc-123"), "sip-inbound-abc-123");
    }

    #[test]
    fn participant_metadata_embeds_caller_number() {
        let metadata = participant_metadata("+33612345678");
        let parsed: serde_json::Value = serde_json::from_str(&metadata).expect("valid json");
        assert_eq!(parsed["caller_number"], "+33612345678");
    }

    #[test]
    fn join_token_generation_with_dev_credentials() {
        let service = RoomService::new(LiveKitConfig::new(
            "http://localhost:7880",
            "devkey",
            "devsecret-devsecret-devsecret-1234",
        ));
        let token = service
            .generate_join_token("sip-inbound-abc", "sip-user-+33612345678", "Caller")
            .expect("token generation should succeed");
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn create_room_requires_configuration() {
        let service = RoomService::new(LiveKitConfig::default());
        let err = service
            .create_room("sip-inbound-abc")
            .await
            .expect_err("unconfigured LiveKit should fail");
        assert!(matches!(err, VoiceError::Config(_)));
    }
}
