// Tests for the synchronous run tracker: simulation, pause semantics,
// finishing and announcements produced during a run.

use anyhow::Result;
use chrono::Utc;
use theo_run::assistant::{AssistantSettings, AssistantTrigger};
use theo_run::geo::{GeoPoint, EARTH_RADIUS_METERS};
use theo_run::location::{RandomWalkSource, ScriptedSource};
use theo_run::run::{CountdownStep, RunState, RunSummary, RunTracker, RUN_TITLE};

/// Points due north of `start`, `step_meters` apart
fn meridian_route(start: GeoPoint, step_meters: f64, steps: usize) -> Vec<GeoPoint> {
    let step_degrees = (step_meters / EARTH_RADIUS_METERS).to_degrees();
    (1..=steps)
        .map(|i| GeoPoint::new(start.latitude + step_degrees * i as f64, start.longitude))
        .collect()
}

fn start_tracking(mut tracker: RunTracker) -> Result<RunTracker> {
    tracker.begin_countdown()?;
    while tracker.countdown_tick()? != CountdownStep::Started {}
    Ok(tracker)
}

fn random_tracker(seed: u64) -> Result<RunTracker> {
    start_tracking(RunTracker::new(
        AssistantSettings::default(),
        None,
        Box::new(RandomWalkSource::seeded(seed)),
        GeoPoint::default(),
    ))
}

fn previous_run(distance_meters: f64) -> RunSummary {
    RunSummary {
        id: "run-previous".to_string(),
        title: RUN_TITLE.to_string(),
        started_at: Utc::now(),
        duration_seconds: 1500,
        distance_meters,
        average_pace_min_per_km: Some(25.0 / (distance_meters / 1000.0)),
        locations: Vec::new(),
        assistant_events: Vec::new(),
        assistant_settings: AssistantSettings::default(),
    }
}

#[test]
fn test_distance_monotonic_and_elapsed_steps_by_one() -> Result<()> {
    let mut tracker = random_tracker(2024)?;

    let mut last_distance = 0.0;
    for expected_elapsed in 1..=300u64 {
        let outcome = tracker.tick()?;
        assert_eq!(outcome.sample.seconds_elapsed, expected_elapsed);
        assert!(outcome.sample.distance_meters >= last_distance);
        last_distance = outcome.sample.distance_meters;
    }

    assert_eq!(tracker.samples().len(), 300);
    assert_eq!(tracker.elapsed_secs(), 300);
    Ok(())
}

#[test]
fn test_same_seed_gives_identical_runs() -> Result<()> {
    let mut a = random_tracker(99)?;
    let mut b = random_tracker(99)?;

    for _ in 0..120 {
        let sa = a.tick()?.sample;
        let sb = b.tick()?.sample;
        assert_eq!(sa.latitude, sb.latitude);
        assert_eq!(sa.longitude, sb.longitude);
        assert_eq!(sa.distance_meters, sb.distance_meters);
        assert_eq!(sa.pace_min_per_km, sb.pace_min_per_km);
    }
    Ok(())
}

#[test]
fn test_random_walk_step_size_is_bounded() -> Result<()> {
    let mut tracker = random_tracker(5)?;
    let mut previous = tracker.position();

    for _ in 0..200 {
        let sample = tracker.tick()?.sample;
        // Half a step on both axes is at most ~11.8 m
        assert!(previous.distance_to(&sample.position()) < 12.0);
        previous = sample.position();
    }
    Ok(())
}

#[test]
fn test_pause_does_not_leak_time() -> Result<()> {
    let mut tracker = random_tracker(8)?;
    for _ in 0..10 {
        tracker.tick()?;
    }
    assert_eq!(tracker.elapsed_secs(), 10);

    tracker.pause()?;
    let distance_at_pause = tracker.distance_meters();
    let position_at_pause = tracker.position();

    // Ticks while paused are rejected and change nothing
    assert!(tracker.tick().is_err());
    assert!(tracker.tick().is_err());
    assert_eq!(tracker.elapsed_secs(), 10);
    assert_eq!(tracker.samples().len(), 10);
    assert_eq!(tracker.distance_meters(), distance_at_pause);

    tracker.resume()?;
    let outcome = tracker.tick()?;

    assert_eq!(outcome.sample.seconds_elapsed, 11);
    assert!(outcome.sample.distance_meters >= distance_at_pause);
    let step = position_at_pause.distance_to(&outcome.sample.position());
    assert!((outcome.sample.distance_meters - distance_at_pause - step).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_pause_rejected_during_countdown() -> Result<()> {
    let mut tracker = RunTracker::new(
        AssistantSettings::default(),
        None,
        Box::new(RandomWalkSource::seeded(1)),
        GeoPoint::default(),
    );
    tracker.begin_countdown()?;

    assert!(tracker.pause().is_err());
    assert!(tracker.tick().is_err());
    assert_eq!(tracker.state(), RunState::Countdown);
    Ok(())
}

#[test]
fn test_finish_matches_totals() -> Result<()> {
    let mut tracker = random_tracker(77)?;
    for _ in 0..50 {
        tracker.tick()?;
    }
    let elapsed = tracker.elapsed_secs();
    let distance = tracker.distance_meters();

    tracker.pause()?;
    tracker.begin_hold()?;
    let summary = tracker.complete_hold()?;

    assert_eq!(summary.duration_seconds, elapsed);
    assert_eq!(summary.distance_meters, distance);
    let expected_pace = (elapsed as f64 / 60.0) / (distance / 1000.0);
    assert_eq!(summary.average_pace_min_per_km, Some(expected_pace));
    assert_eq!(summary.locations.len(), 50);
    assert_eq!(summary.title, RUN_TITLE);
    assert!(summary.id.starts_with("run-"));
    assert_eq!(tracker.state(), RunState::Completed);
    Ok(())
}

#[test]
fn test_finish_with_zero_distance_has_no_pace() -> Result<()> {
    let start = GeoPoint::default();
    let mut tracker = start_tracking(RunTracker::new(
        AssistantSettings::default(),
        None,
        Box::new(ScriptedSource::new(vec![start])),
        start,
    ))?;

    for _ in 0..5 {
        let sample = tracker.tick()?.sample;
        assert_eq!(sample.distance_meters, 0.0);
        assert_eq!(sample.pace_min_per_km, None);
    }

    tracker.pause()?;
    tracker.begin_hold()?;
    let summary = tracker.complete_hold()?;

    assert_eq!(summary.duration_seconds, 5);
    assert_eq!(summary.distance_meters, 0.0);
    assert_eq!(summary.average_pace_min_per_km, None);
    Ok(())
}

#[test]
fn test_released_hold_changes_nothing() -> Result<()> {
    let mut tracker = random_tracker(3)?;
    for _ in 0..20 {
        tracker.tick()?;
    }
    tracker.pause()?;
    let before = tracker.snapshot();

    tracker.begin_hold()?;
    assert_eq!(tracker.state(), RunState::Finalizing);
    tracker.release_hold()?;

    let after = tracker.snapshot();
    assert_eq!(after.state, RunState::Paused);
    assert_eq!(after.elapsed_secs, before.elapsed_secs);
    assert_eq!(after.distance_meters, before.distance_meters);
    assert_eq!(after.samples_count, before.samples_count);
    Ok(())
}

#[test]
fn test_finish_only_once() -> Result<()> {
    let mut tracker = random_tracker(4)?;
    tracker.tick()?;
    tracker.pause()?;
    tracker.begin_hold()?;
    tracker.complete_hold()?;

    assert!(tracker.complete_hold().is_err());
    assert!(tracker.begin_hold().is_err());
    assert!(tracker.cancel().is_err());
    Ok(())
}

#[test]
fn test_cancel_stops_tracking() -> Result<()> {
    let mut tracker = random_tracker(6)?;
    tracker.tick()?;
    tracker.cancel()?;

    assert_eq!(tracker.state(), RunState::Cancelled);
    assert!(tracker.tick().is_err());
    Ok(())
}

#[test]
fn test_distance_announcement_compares_with_last_run() -> Result<()> {
    let start = GeoPoint::default();
    let settings = AssistantSettings {
        trigger: AssistantTrigger::Km,
        interval_km: 1,
        ..Default::default()
    };
    let last = previous_run(4000.0);

    let mut tracker = start_tracking(RunTracker::new(
        settings,
        Some(&last),
        Box::new(ScriptedSource::new(meridian_route(start, 260.0, 8))),
        start,
    ))?;

    let mut fired_at = Vec::new();
    for _ in 0..8 {
        let outcome = tracker.tick()?;
        if outcome.announcement.is_some() {
            fired_at.push(outcome.sample.seconds_elapsed);
        }
    }

    // 1040 m at tick 4, 2080 m at tick 8
    assert_eq!(fired_at, vec![4, 8]);
    assert_eq!(tracker.events().len(), 2);
    assert_eq!(
        tracker.events()[0].message,
        "Average pace 0:04 min/km · Distance 1.04 km · You are on pace for 5 km in 30 min · 2.96 km left to reach your last run"
    );
    assert!(tracker.events()[0].audio_file.is_none());
    Ok(())
}

#[test]
fn test_minutes_announcements_during_run() -> Result<()> {
    let settings = AssistantSettings {
        interval_minutes: 1,
        announce_comparison: false,
        ..Default::default()
    };
    let mut tracker = start_tracking(RunTracker::new(
        settings,
        None,
        Box::new(RandomWalkSource::seeded(10)),
        GeoPoint::default(),
    ))?;

    let mut fired_at = Vec::new();
    for _ in 0..180 {
        let outcome = tracker.tick()?;
        if outcome.announcement.is_some() {
            fired_at.push(outcome.sample.seconds_elapsed);
        }
    }

    assert_eq!(fired_at, vec![60, 120, 180]);
    Ok(())
}

#[test]
fn test_disabled_assistant_is_silent() -> Result<()> {
    let settings = AssistantSettings {
        enabled: false,
        interval_minutes: 1,
        ..Default::default()
    };
    let mut tracker = start_tracking(RunTracker::new(
        settings,
        None,
        Box::new(RandomWalkSource::seeded(12)),
        GeoPoint::default(),
    ))?;

    for _ in 0..180 {
        tracker.tick()?;
    }
    assert!(tracker.events().is_empty());
    Ok(())
}

#[test]
fn test_snapshot_formats_and_goal_progress() -> Result<()> {
    let start = GeoPoint::default();
    let mut tracker = start_tracking(RunTracker::new(
        AssistantSettings::default(),
        None,
        Box::new(ScriptedSource::new(meridian_route(start, 500.0, 11))),
        start,
    ))?;

    for _ in 0..5 {
        tracker.tick()?;
    }
    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.elapsed_secs, 5);
    assert_eq!(snapshot.duration_display, "00:05");
    assert_eq!(snapshot.distance_display, "2.50 km");
    assert!((snapshot.goal_progress_percent - 50.0).abs() < 1e-6);
    assert!(!snapshot.goal_reached);

    for _ in 0..6 {
        tracker.tick()?;
    }
    let snapshot = tracker.snapshot();
    // 5.5 km, capped at 100%
    assert_eq!(snapshot.goal_progress_percent, 100.0);
    assert!(snapshot.goal_reached);
    Ok(())
}
