//! LiveKit glue for the ARIA call-center agent.
//!
//! Inbound SIP calls are routed by the voice platform: LiveKit posts a
//! webhook for each incoming call, ARIA creates a room for it, and the
//! platform drops the caller and the agent worker into that room. This
//! crate owns room naming, room creation, and join-token generation.
//!
//! The speech pipeline itself (STT, LLM, TTS) runs on the voice platform
//! and is not represented here.

mod config;
mod error;
mod room;

pub use config::LiveKitConfig;
pub use error::VoiceError;
pub use room::{inbound_room_name, participant_metadata, RoomService};
