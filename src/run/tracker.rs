use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::state::{RunCommand, RunState};
use super::stats::{goal_progress_percent, LocationSample, RunSnapshot, RunSummary};
use crate::assistant::{AnnouncementContext, Announcer, AssistantEvent, AssistantSettings};
use crate::format::{average_pace, format_distance, format_duration, format_pace, format_speed};
use crate::geo::{haversine_distance, GeoPoint};
use crate::location::LocationSource;

/// Seconds in the pre-run countdown
pub const DEFAULT_COUNTDOWN_SECS: u8 = 3;

/// Title given to every finished run
pub const RUN_TITLE: &str = "Guided run";

/// Result of one countdown second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// Seconds still to go
    Remaining(u8),
    /// Countdown finished, tracking has begun
    Started,
}

/// Everything one tracking tick produced
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub sample: LocationSample,
    pub announcement: Option<AssistantEvent>,
}

/// Synchronous run state machine
///
/// Owns all state for one run. Every operation takes `&mut self`, so a tick
/// always completes (position, distance, sample, announcement) before the next
/// command is applied. Timing lives in [`super::RunSession`].
pub struct RunTracker {
    id: String,
    created_at: DateTime<Utc>,

    /// Snapshot of the settings taken when the run was created
    settings: AssistantSettings,

    /// Distance of the previous run, for comparison announcements
    last_run_distance_meters: Option<f64>,

    source: Box<dyn LocationSource>,
    announcer: Announcer,

    state: RunState,
    countdown_secs: u8,
    countdown: u8,
    started_at: Option<DateTime<Utc>>,
    elapsed_secs: u64,
    distance_meters: f64,
    position: GeoPoint,
    samples: Vec<LocationSample>,
    events: Vec<AssistantEvent>,
}

impl RunTracker {
    pub fn new(
        settings: AssistantSettings,
        last_run: Option<&RunSummary>,
        source: Box<dyn LocationSource>,
        start: GeoPoint,
    ) -> Self {
        let id = format!("run-{}", uuid::Uuid::new_v4());
        debug!("Creating run tracker {} with {} source", id, source.name());

        Self {
            id,
            created_at: Utc::now(),
            settings,
            last_run_distance_meters: last_run.map(|run| run.distance_meters),
            source,
            announcer: Announcer::new(),
            state: RunState::Idle,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            countdown: DEFAULT_COUNTDOWN_SECS,
            started_at: None,
            elapsed_secs: 0,
            distance_meters: 0.0,
            position: start,
            samples: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Override the countdown length (at least one second)
    pub fn with_countdown(mut self, secs: u8) -> Self {
        self.countdown_secs = secs.max(1);
        self.countdown = self.countdown_secs;
        self
    }

    fn apply(&mut self, command: RunCommand) -> Result<()> {
        let next = self.state.transition(command)?;
        debug!("Run {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Enter the countdown; returns the number of seconds to count
    pub fn begin_countdown(&mut self) -> Result<u8> {
        self.apply(RunCommand::Start)?;
        self.countdown = self.countdown_secs;
        info!("Run {} counting down from {}", self.id, self.countdown);
        Ok(self.countdown)
    }

    /// Advance the countdown by one second
    pub fn countdown_tick(&mut self) -> Result<CountdownStep> {
        if self.state != RunState::Countdown {
            anyhow::bail!("run {} is not counting down ({:?})", self.id, self.state);
        }

        if self.countdown > 1 {
            self.countdown -= 1;
            return Ok(CountdownStep::Remaining(self.countdown));
        }

        self.apply(RunCommand::CountdownElapsed)?;
        self.countdown = 0;
        self.elapsed_secs = 0;
        self.started_at = Some(Utc::now());
        self.announcer.reset();

        info!("Run {} started", self.id);
        Ok(CountdownStep::Started)
    }

    /// One tracking second, stamped with the current time
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.tick_at(Utc::now())
    }

    /// One tracking second: move, accumulate distance, record a sample and
    /// evaluate the assistant.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<TickOutcome> {
        if !self.state.is_ticking() {
            anyhow::bail!("run {} is not tracking ({:?})", self.id, self.state);
        }

        let next = self.source.next_position(self.position);
        let increment = haversine_distance(&self.position, &next);

        self.elapsed_secs += 1;
        self.distance_meters += increment;
        self.position = next;

        let pace = average_pace(self.elapsed_secs, self.distance_meters);

        let sample = LocationSample {
            latitude: next.latitude,
            longitude: next.longitude,
            timestamp: now,
            seconds_elapsed: self.elapsed_secs,
            pace_min_per_km: pace,
            distance_meters: self.distance_meters,
        };
        self.samples.push(sample.clone());

        let ctx = AnnouncementContext {
            elapsed_secs: self.elapsed_secs,
            distance_meters: self.distance_meters,
            pace_min_per_km: pace,
            last_run_distance_meters: self.last_run_distance_meters,
        };

        let announcement = self.announcer.evaluate(&self.settings, &ctx, now);
        if let Some(event) = &announcement {
            info!("Run {} announcement: {}", self.id, event.message);
            self.events.push(event.clone());
        }

        Ok(TickOutcome {
            sample,
            announcement,
        })
    }

    pub fn pause(&mut self) -> Result<()> {
        self.apply(RunCommand::Pause)?;
        info!("Run {} paused at {}s", self.id, self.elapsed_secs);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.apply(RunCommand::Resume)?;
        info!("Run {} resumed at {}s", self.id, self.elapsed_secs);
        Ok(())
    }

    /// Finish button pressed down
    pub fn begin_hold(&mut self) -> Result<()> {
        self.apply(RunCommand::HoldStart)
    }

    /// Finish button released before the hold completed
    pub fn release_hold(&mut self) -> Result<()> {
        self.apply(RunCommand::HoldRelease)
    }

    /// Hold completed: close the run and build its summary
    pub fn complete_hold(&mut self) -> Result<RunSummary> {
        self.apply(RunCommand::HoldComplete)?;

        let summary = self.summary();
        info!(
            "Run {} finished: {} in {} ({} samples, {} announcements)",
            self.id,
            format_distance(summary.distance_meters),
            format_duration(summary.duration_seconds),
            summary.locations.len(),
            summary.assistant_events.len()
        );
        Ok(summary)
    }

    pub fn cancel(&mut self) -> Result<()> {
        self.apply(RunCommand::Cancel)?;
        info!("Run {} cancelled", self.id);
        Ok(())
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            id: self.id.clone(),
            title: RUN_TITLE.to_string(),
            started_at: self.started_at.unwrap_or(self.created_at),
            duration_seconds: self.elapsed_secs,
            distance_meters: self.distance_meters,
            average_pace_min_per_km: average_pace(self.elapsed_secs, self.distance_meters),
            locations: self.samples.clone(),
            assistant_events: self.events.clone(),
            assistant_settings: self.settings.clone(),
        }
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let pace = average_pace(self.elapsed_secs, self.distance_meters);
        let goal_progress = goal_progress_percent(self.distance_meters);

        RunSnapshot {
            run_id: self.id.clone(),
            state: self.state,
            countdown: if self.state == RunState::Countdown {
                self.countdown
            } else {
                0
            },
            started_at: self.started_at,
            elapsed_secs: self.elapsed_secs,
            distance_meters: self.distance_meters,
            position: self.position,
            average_pace_min_per_km: pace,
            samples_count: self.samples.len(),
            events_count: self.events.len(),
            goal_progress_percent: goal_progress,
            goal_reached: goal_progress >= 100.0,
            duration_display: format_duration(self.elapsed_secs),
            distance_display: format_distance(self.distance_meters),
            pace_display: format_pace(pace),
            speed_display: format_speed(self.distance_meters, self.elapsed_secs),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn samples(&self) -> &[LocationSample] {
        &self.samples
    }

    pub fn events(&self) -> &[AssistantEvent] {
        &self.events
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }
}
