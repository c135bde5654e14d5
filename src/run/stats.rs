use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::RunState;
use crate::assistant::{AssistantEvent, AssistantSettings, GOAL_DISTANCE_METERS};
use crate::format::{format_distance, format_duration, format_pace};
use crate::geo::GeoPoint;

/// One simulated GPS fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,

    /// When the fix was captured
    pub timestamp: DateTime<Utc>,

    /// Seconds since the run started
    pub seconds_elapsed: u64,

    /// Average pace so far, `None` until some distance is covered
    pub pace_min_per_km: Option<f64>,

    /// Cumulative distance at this fix
    pub distance_meters: f64,
}

impl LocationSample {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Finished run record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: String,
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub distance_meters: f64,
    pub average_pace_min_per_km: Option<f64>,
    pub locations: Vec<LocationSample>,
    pub assistant_events: Vec<AssistantEvent>,
    pub assistant_settings: AssistantSettings,
}

impl RunSummary {
    /// Display row for the activity history
    pub fn formatted(&self) -> ActivityRow {
        ActivityRow {
            id: self.id.clone(),
            title: self.title.clone(),
            started_at: self.started_at,
            distance: format_distance(self.distance_meters),
            duration: format_duration(self.duration_seconds),
            pace: format!("{} /km", format_pace(self.average_pace_min_per_km)),
            points: self.locations.len(),
            announcements: self.assistant_events.len(),
        }
    }
}

/// Formatted activity history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: String,
    pub title: String,
    pub started_at: DateTime<Utc>,
    pub distance: String,
    pub duration: String,
    pub pace: String,
    pub points: usize,
    pub announcements: usize,
}

/// Live statistics about an in-progress run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub run_id: String,
    pub state: RunState,

    /// Seconds left in the 3-2-1 countdown (0 once tracking)
    pub countdown: u8,

    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_secs: u64,
    pub distance_meters: f64,
    pub position: GeoPoint,
    pub average_pace_min_per_km: Option<f64>,
    pub samples_count: usize,
    pub events_count: usize,

    /// Progress towards the 5 km goal, 0-100
    pub goal_progress_percent: f64,
    pub goal_reached: bool,

    pub duration_display: String,
    pub distance_display: String,
    pub pace_display: String,
    pub speed_display: String,
}

/// Percent of the distance goal covered, capped at 100
pub fn goal_progress_percent(distance_meters: f64) -> f64 {
    ((distance_meters / GOAL_DISTANCE_METERS) * 100.0).clamp(0.0, 100.0)
}

