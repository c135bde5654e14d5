use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How pace is spoken in announcements
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaceMode {
    /// Minutes per kilometer (`5:10 min/km`)
    #[default]
    MinPerKm,
    /// Average speed (`11.6 km/h`)
    AvgSpeed,
}

/// What drives announcement timing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssistantTrigger {
    /// Every `interval_minutes` of elapsed time
    #[default]
    Minutes,
    /// Every `interval_km` of distance
    Km,
}

/// Voice assistant configuration
///
/// Missing fields take their defaults, so a config file may set only the
/// values it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Master switch for announcements
    pub enabled: bool,

    /// Pace (min/km) or average speed (km/h)
    pub pace_mode: PaceMode,

    /// Speak the distance covered so far
    pub announce_distance: bool,

    /// Speak progress against the 5 km in 30 min goal
    pub announce_goal_status: bool,

    /// Speak the gap to the previous run's distance
    pub announce_comparison: bool,

    /// Attach a narration file name to each event for the run video
    pub save_audio_to_video: bool,

    /// Ask the video generator to pause at each announcement
    pub add_video_breakpoints: bool,

    /// Elapsed minutes or distance
    pub trigger: AssistantTrigger,

    /// Minutes between announcements (>= 1)
    pub interval_minutes: u32,

    /// Kilometers between announcements (>= 1)
    pub interval_km: u32,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            pace_mode: PaceMode::MinPerKm,
            announce_distance: true,
            announce_goal_status: true,
            announce_comparison: true,
            save_audio_to_video: false,
            add_video_breakpoints: false,
            trigger: AssistantTrigger::Minutes,
            interval_minutes: 2,
            interval_km: 1,
        }
    }
}

impl AssistantSettings {
    /// Reject settings that would produce a zero-length announcement period
    pub fn validate(&self) -> Result<()> {
        if self.interval_minutes == 0 {
            anyhow::bail!("interval_minutes must be at least 1");
        }
        if self.interval_km == 0 {
            anyhow::bail!("interval_km must be at least 1");
        }
        Ok(())
    }

    /// Apply a partial update given as a JSON object; fields it omits keep
    /// their current values
    pub fn merged(&self, patch: &serde_json::Value) -> Result<Self> {
        let Some(changes) = patch.as_object() else {
            anyhow::bail!("settings update must be a JSON object");
        };

        let mut current = serde_json::to_value(self)?;
        if let Some(fields) = current.as_object_mut() {
            for (key, value) in changes {
                if !fields.contains_key(key) {
                    anyhow::bail!("unknown assistant setting: {}", key);
                }
                fields.insert(key.clone(), value.clone());
            }
        }

        let updated: Self =
            serde_json::from_value(current).context("Invalid assistant settings update")?;
        updated.validate()?;
        Ok(updated)
    }

    /// Step both intervals up together so switching trigger keeps them in sync
    pub fn increment_interval(&mut self) {
        self.interval_minutes = self.interval_minutes.saturating_add(1);
        self.interval_km = self.interval_km.saturating_add(1);
    }

    /// Step both intervals down, never below 1
    pub fn decrement_interval(&mut self) {
        self.interval_minutes = self.interval_minutes.saturating_sub(1).max(1);
        self.interval_km = self.interval_km.saturating_sub(1).max(1);
    }

    /// Interval for the active trigger, clamped to at least 1
    pub fn active_interval(&self) -> u32 {
        match self.trigger {
            AssistantTrigger::Minutes => self.interval_minutes.max(1),
            AssistantTrigger::Km => self.interval_km.max(1),
        }
    }

    /// Human readable interval, e.g. `2 min` or `1 km`
    pub fn trigger_label(&self) -> String {
        match self.trigger {
            AssistantTrigger::Minutes => format!("{} min", self.interval_minutes),
            AssistantTrigger::Km => format!("{} km", self.interval_km),
        }
    }
}
