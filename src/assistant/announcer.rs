use chrono::{DateTime, Utc};
use tracing::debug;

use super::event::AssistantEvent;
use super::settings::{AssistantSettings, AssistantTrigger, PaceMode};
use crate::format::{format_distance, format_pace, format_speed};

/// Goal distance: 5 km
pub const GOAL_DISTANCE_METERS: f64 = 5000.0;

/// Goal time: 30 minutes
pub const GOAL_TIME_SECONDS: f64 = 30.0 * 60.0;

/// Separator between announcement clauses
pub const MESSAGE_SEPARATOR: &str = " · ";

/// Run metrics at the moment an announcement is evaluated
#[derive(Debug, Clone, Copy)]
pub struct AnnouncementContext {
    pub elapsed_secs: u64,
    pub distance_meters: f64,
    pub pace_min_per_km: Option<f64>,
    /// Total distance of the previous run, when there is one
    pub last_run_distance_meters: Option<f64>,
}

/// Decides when to announce and composes what is said
///
/// Holds the distance watermark: the last km threshold that fired, so the
/// same threshold is never announced twice.
#[derive(Debug, Clone, Default)]
pub struct Announcer {
    last_announced_km: f64,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the watermark at the start of a run
    pub fn reset(&mut self) {
        self.last_announced_km = 0.0;
    }

    pub fn last_announced_km(&self) -> f64 {
        self.last_announced_km
    }

    /// Check whether an announcement is due, advancing the km watermark when
    /// a distance threshold fires.
    pub fn should_announce(
        &mut self,
        settings: &AssistantSettings,
        elapsed_secs: u64,
        distance_meters: f64,
    ) -> bool {
        if !settings.enabled {
            return false;
        }

        match settings.trigger {
            AssistantTrigger::Minutes => {
                let interval_secs = u64::from(settings.interval_minutes.max(1)) * 60;
                // Elapsed 0 is before the first tick and never announces
                elapsed_secs > 0 && elapsed_secs % interval_secs == 0
            }
            AssistantTrigger::Km => {
                let interval_km = f64::from(settings.interval_km.max(1));
                let current_km = distance_meters / 1000.0;

                if current_km >= interval_km && current_km - self.last_announced_km >= interval_km {
                    // Snap to the threshold crossed, not the overshoot
                    self.last_announced_km = (current_km / interval_km).floor() * interval_km;
                    debug!(
                        "Distance announcement at {:.3} km, watermark now {} km",
                        current_km, self.last_announced_km
                    );
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Build the announcement text from the enabled clauses
    pub fn compose_message(
        settings: &AssistantSettings,
        ctx: &AnnouncementContext,
    ) -> Option<String> {
        let mut clauses = Vec::with_capacity(4);

        clauses.push(match settings.pace_mode {
            PaceMode::MinPerKm => format!("Average pace {} min/km", format_pace(ctx.pace_min_per_km)),
            PaceMode::AvgSpeed => format!(
                "Average speed {}",
                format_speed(ctx.distance_meters, ctx.elapsed_secs)
            ),
        });

        if settings.announce_distance {
            clauses.push(format!("Distance {}", format_distance(ctx.distance_meters)));
        }

        if settings.announce_goal_status {
            clauses.push(goal_status(ctx).to_string());
        }

        if settings.announce_comparison {
            if let Some(last_meters) = ctx.last_run_distance_meters {
                clauses.push(comparison(ctx.distance_meters, last_meters));
            }
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(MESSAGE_SEPARATOR))
        }
    }

    /// Evaluate the trigger and, if due, produce the event to append
    pub fn evaluate(
        &mut self,
        settings: &AssistantSettings,
        ctx: &AnnouncementContext,
        now: DateTime<Utc>,
    ) -> Option<AssistantEvent> {
        if !self.should_announce(settings, ctx.elapsed_secs, ctx.distance_meters) {
            return None;
        }

        let message = Self::compose_message(settings, ctx)?;
        Some(AssistantEvent::new(now, message, settings.save_audio_to_video))
    }
}

fn goal_status(ctx: &AnnouncementContext) -> &'static str {
    if ctx.distance_meters >= GOAL_DISTANCE_METERS {
        return "Distance goal complete";
    }

    let target_pace_secs = GOAL_TIME_SECONDS / (GOAL_DISTANCE_METERS / 1000.0);
    match ctx.pace_min_per_km {
        Some(pace) if pace * 60.0 <= target_pace_secs => "You are on pace for 5 km in 30 min",
        _ => "You need to speed up to hit the goal",
    }
}

fn comparison(current_meters: f64, last_meters: f64) -> String {
    let current_km = current_meters / 1000.0;
    let last_km = last_meters / 1000.0;

    if current_km >= last_km {
        "You have already passed your last run's distance".to_string()
    } else {
        format!("{:.2} km left to reach your last run", last_km - current_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(distance_meters: f64, pace: Option<f64>) -> AnnouncementContext {
        AnnouncementContext {
            elapsed_secs: 600,
            distance_meters,
            pace_min_per_km: pace,
            last_run_distance_meters: None,
        }
    }

    #[test]
    fn test_goal_distance_overrides_pace() {
        // Slow pace but the distance goal is already met
        assert_eq!(goal_status(&ctx(5000.0, Some(9.0))), "Distance goal complete");
    }

    #[test]
    fn test_goal_pace_boundary_is_on_pace() {
        assert_eq!(goal_status(&ctx(1000.0, Some(6.0))), "You are on pace for 5 km in 30 min");
        assert_eq!(goal_status(&ctx(1000.0, Some(6.01))), "You need to speed up to hit the goal");
        assert_eq!(goal_status(&ctx(0.0, None)), "You need to speed up to hit the goal");
    }

    #[test]
    fn test_comparison_gap() {
        assert_eq!(comparison(2500.0, 4000.0), "1.50 km left to reach your last run");
        assert_eq!(comparison(4000.0, 4000.0), "You have already passed your last run's distance");
    }

    #[test]
    fn test_disabled_never_announces() {
        let settings = AssistantSettings {
            enabled: false,
            ..Default::default()
        };
        let mut announcer = Announcer::new();
        assert!(!announcer.should_announce(&settings, 120, 0.0));
    }
}
