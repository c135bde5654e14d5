use anyhow::Result;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::state::RunState;
use super::stats::{LocationSample, RunSnapshot, RunSummary};
use super::tracker::{CountdownStep, RunTracker};
use crate::assistant::AssistantEvent;

/// Capacity of the live update channel; slow subscribers lag and skip
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Timer settings for a run session
#[derive(Debug, Clone)]
pub struct RunTimings {
    /// Cadence of both the countdown and the tracking tick
    pub tick_interval: Duration,

    /// Seconds counted down before tracking starts
    pub countdown_secs: u8,

    /// How long the finish button must be held
    pub hold_to_finish: Duration,
}

impl Default for RunTimings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            countdown_secs: 3,
            hold_to_finish: Duration::from_secs(5),
        }
    }
}

/// Live update published while a run is in progress
#[derive(Debug, Clone)]
pub enum RunUpdate {
    Countdown(u8),
    StateChanged(RunState),
    Sample(LocationSample),
    Announcement(AssistantEvent),
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Finished(RunSummary),
    Cancelled { run_id: String },
}

/// Task handles are only touched between awaits, so a std mutex suffices
type TaskSlot = Arc<StdMutex<Option<JoinHandle<()>>>>;
type OutcomeSlot = Arc<Mutex<Option<oneshot::Sender<RunOutcome>>>>;

/// A run driven by real timers
///
/// Wraps a [`RunTracker`] with three independent, cancellable tokio tasks:
/// - countdown (fixed cadence, not affected by pause)
/// - tracking ticker (only alive while tracking)
/// - finish hold (fires once the button has been held long enough)
///
/// Live samples and announcements go out on a broadcast channel; the final
/// outcome is delivered once on a oneshot channel.
pub struct RunSession {
    run_id: String,
    timings: RunTimings,
    tracker: Arc<Mutex<RunTracker>>,
    updates: broadcast::Sender<RunUpdate>,
    outcome_tx: OutcomeSlot,
    outcome_rx: Mutex<Option<oneshot::Receiver<RunOutcome>>>,
    countdown_task: TaskSlot,
    ticker_task: TaskSlot,
    hold_task: TaskSlot,
}

impl RunSession {
    pub fn new(tracker: RunTracker, timings: RunTimings) -> Self {
        let tracker = tracker.with_countdown(timings.countdown_secs);
        let run_id = tracker.id().to_string();
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        info!("Creating run session: {}", run_id);

        Self {
            run_id,
            timings,
            tracker: Arc::new(Mutex::new(tracker)),
            updates,
            outcome_tx: Arc::new(Mutex::new(Some(outcome_tx))),
            outcome_rx: Mutex::new(Some(outcome_rx)),
            countdown_task: Arc::new(StdMutex::new(None)),
            ticker_task: Arc::new(StdMutex::new(None)),
            hold_task: Arc::new(StdMutex::new(None)),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Subscribe to live samples, announcements and state changes
    pub fn subscribe(&self) -> broadcast::Receiver<RunUpdate> {
        self.updates.subscribe()
    }

    /// Take the receiver for the final outcome. Only the first caller gets it.
    pub async fn take_outcome(&self) -> Option<oneshot::Receiver<RunOutcome>> {
        self.outcome_rx.lock().await.take()
    }

    /// Start the countdown; tracking begins when it reaches zero
    pub async fn start(&self) -> Result<()> {
        let mut guard = self.tracker.lock().await;
        let remaining = guard.begin_countdown()?;
        let _ = self.updates.send(RunUpdate::StateChanged(RunState::Countdown));
        let _ = self.updates.send(RunUpdate::Countdown(remaining));

        let tracker = Arc::clone(&self.tracker);
        let updates = self.updates.clone();
        let ticker_slot = Arc::clone(&self.ticker_task);
        let period = self.timings.tick_interval;

        let countdown = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);

            loop {
                interval.tick().await;

                // The guard stays held until the ticker is in its slot, so a
                // pause can never slip in ahead of it
                let mut guard = tracker.lock().await;
                match guard.countdown_tick() {
                    Ok(CountdownStep::Remaining(n)) => {
                        let _ = updates.send(RunUpdate::Countdown(n));
                    }
                    Ok(CountdownStep::Started) => {
                        let _ = updates.send(RunUpdate::Countdown(0));
                        let _ = updates.send(RunUpdate::StateChanged(RunState::Tracking));
                        let ticker = spawn_ticker(Arc::clone(&tracker), updates.clone(), period);
                        store_task(&ticker_slot, ticker);
                        break;
                    }
                    Err(e) => {
                        debug!("Countdown stopped: {}", e);
                        break;
                    }
                }
            }
        });

        store_task(&self.countdown_task, countdown);
        drop(guard);
        Ok(())
    }

    /// Suspend tracking; no samples are recorded until resumed
    pub async fn pause(&self) -> Result<()> {
        let mut tracker = self.tracker.lock().await;
        tracker.pause()?;
        abort_task(&self.ticker_task);
        drop(tracker);

        let _ = self.updates.send(RunUpdate::StateChanged(RunState::Paused));
        Ok(())
    }

    /// Resume tracking from exactly where it was paused
    pub async fn resume(&self) -> Result<()> {
        let mut tracker = self.tracker.lock().await;
        tracker.resume()?;

        let ticker = spawn_ticker(
            Arc::clone(&self.tracker),
            self.updates.clone(),
            self.timings.tick_interval,
        );
        store_task(&self.ticker_task, ticker);
        drop(tracker);

        let _ = self.updates.send(RunUpdate::StateChanged(RunState::Tracking));
        Ok(())
    }

    /// Finish button pressed; the run finishes if it stays held long enough
    pub async fn hold_start(&self) -> Result<()> {
        let mut guard = self.tracker.lock().await;
        guard.begin_hold()?;
        let _ = self.updates.send(RunUpdate::StateChanged(RunState::Finalizing));

        let tracker = Arc::clone(&self.tracker);
        let updates = self.updates.clone();
        let outcome_tx = Arc::clone(&self.outcome_tx);
        let hold = self.timings.hold_to_finish;

        let task = tokio::spawn(async move {
            time::sleep(hold).await;

            let summary = tracker.lock().await.complete_hold();
            match summary {
                Ok(summary) => {
                    let _ = updates.send(RunUpdate::StateChanged(RunState::Completed));
                    deliver(&outcome_tx, RunOutcome::Finished(summary)).await;
                }
                Err(e) => warn!("Finish hold expired on a closed run: {}", e),
            }
        });

        store_task(&self.hold_task, task);
        drop(guard);
        Ok(())
    }

    /// Finish button released early; nothing changes beyond leaving the hold
    pub async fn hold_release(&self) -> Result<()> {
        let mut tracker = self.tracker.lock().await;
        tracker.release_hold()?;
        abort_task(&self.hold_task);
        drop(tracker);

        let _ = self.updates.send(RunUpdate::StateChanged(RunState::Paused));
        Ok(())
    }

    /// Abort the run without producing a summary
    pub async fn cancel(&self) -> Result<()> {
        let mut tracker = self.tracker.lock().await;
        tracker.cancel()?;

        abort_task(&self.countdown_task);
        abort_task(&self.ticker_task);
        abort_task(&self.hold_task);
        drop(tracker);

        let _ = self.updates.send(RunUpdate::StateChanged(RunState::Cancelled));
        deliver(
            &self.outcome_tx,
            RunOutcome::Cancelled {
                run_id: self.run_id.clone(),
            },
        )
        .await;
        Ok(())
    }

    pub async fn snapshot(&self) -> RunSnapshot {
        self.tracker.lock().await.snapshot()
    }

    pub async fn state(&self) -> RunState {
        self.tracker.lock().await.state()
    }

    pub async fn events(&self) -> Vec<AssistantEvent> {
        self.tracker.lock().await.events().to_vec()
    }

    pub async fn samples(&self) -> Vec<LocationSample> {
        self.tracker.lock().await.samples().to_vec()
    }
}

impl Drop for RunSession {
    fn drop(&mut self) {
        for slot in [&self.countdown_task, &self.ticker_task, &self.hold_task] {
            abort_task(slot);
        }
    }
}

fn spawn_ticker(
    tracker: Arc<Mutex<RunTracker>>,
    updates: broadcast::Sender<RunUpdate>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let outcome = tracker.lock().await.tick();
            match outcome {
                Ok(outcome) => {
                    let _ = updates.send(RunUpdate::Sample(outcome.sample));
                    if let Some(event) = outcome.announcement {
                        let _ = updates.send(RunUpdate::Announcement(event));
                    }
                }
                Err(e) => {
                    debug!("Ticker stopped: {}", e);
                    break;
                }
            }
        }
    })
}

fn lock_slot(slot: &TaskSlot) -> MutexGuard<'_, Option<JoinHandle<()>>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Put a task in its slot, aborting whatever was there before
fn store_task(slot: &TaskSlot, task: JoinHandle<()>) {
    if let Some(previous) = lock_slot(slot).replace(task) {
        if !previous.is_finished() {
            warn!("Replacing a live session task");
            previous.abort();
        }
    }
}

fn abort_task(slot: &TaskSlot) {
    if let Some(task) = lock_slot(slot).take() {
        task.abort();
    }
}

async fn deliver(slot: &OutcomeSlot, outcome: RunOutcome) {
    match slot.lock().await.take() {
        Some(tx) => {
            if tx.send(outcome).is_err() {
                debug!("Run outcome dropped, nobody is waiting for it");
            }
        }
        None => error!("Run outcome already delivered"),
    }
}
