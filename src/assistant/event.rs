use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context tag attached to every announcer event
pub const VOICE_ASSISTANT_CONTEXT: &str = "voice-assistant";

/// A single announcement fired during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantEvent {
    /// When the announcement fired
    pub timestamp: DateTime<Utc>,

    /// Composed message, clauses joined with ` · `
    pub message: String,

    /// Optional context tag
    pub context: Option<String>,

    /// Placeholder narration file name, only when audio is saved into the video
    pub audio_file: Option<String>,
}

impl AssistantEvent {
    pub fn new(timestamp: DateTime<Utc>, message: String, save_audio: bool) -> Self {
        let audio_file = save_audio.then(|| audio_file_name(timestamp));
        Self {
            timestamp,
            message,
            context: Some(VOICE_ASSISTANT_CONTEXT.to_string()),
            audio_file,
        }
    }
}

/// `audio-<unix millis>.mp3`
fn audio_file_name(timestamp: DateTime<Utc>) -> String {
    format!("audio-{}.mp3", timestamp.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_audio_file_only_when_saving() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        let with_audio = AssistantEvent::new(ts, "hello".to_string(), true);
        assert_eq!(with_audio.audio_file.as_deref(), Some("audio-1700000000123.mp3"));
        assert_eq!(with_audio.context.as_deref(), Some(VOICE_ASSISTANT_CONTEXT));

        let without = AssistantEvent::new(ts, "hello".to_string(), false);
        assert!(without.audio_file.is_none());
    }
}
