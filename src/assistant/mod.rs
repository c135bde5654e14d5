//! Voice assistant for guided runs
//!
//! This module decides when an announcement is due and what it says:
//! - Settings chosen by the runner (trigger, interval, which clauses to speak)
//! - Trigger evaluation (elapsed minutes or distance watermark)
//! - Message composition (pace/speed, distance, goal status, last-run comparison)
//!
//! Audio is never synthesized here; events only carry a placeholder file name
//! for the video generator when embedding is enabled.

mod announcer;
mod event;
mod settings;

pub use announcer::{
    AnnouncementContext, Announcer, GOAL_DISTANCE_METERS, GOAL_TIME_SECONDS, MESSAGE_SEPARATOR,
};
pub use event::{AssistantEvent, VOICE_ASSISTANT_CONTEXT};
pub use settings::{AssistantSettings, AssistantTrigger, PaceMode};
