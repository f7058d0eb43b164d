// Purpose: Voice management for a playback session
// This layer sits above graph nodes: one voice per instrument class, driven by control messages

pub mod bank;
pub mod message;
pub mod voice;

pub use bank::{SessionRenderer, VoiceBank};
pub use message::{SharedControls, SynthMessage};
pub use voice::Voice;
