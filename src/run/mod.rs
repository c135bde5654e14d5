//! Run tracking
//!
//! This module provides the run lifecycle:
//! - `RunState`: explicit state machine and transition table
//! - `RunTracker`: synchronous core that simulates GPS, accumulates distance
//!   and fires assistant announcements once per tick
//! - `RunSession`: tokio timers (countdown, tick, finish hold) around a tracker
//! - Records: location samples, live snapshots and the finished run summary

mod session;
mod state;
mod stats;
mod tracker;

pub use session::{RunOutcome, RunSession, RunTimings, RunUpdate};
pub use state::{RunCommand, RunState};
pub use stats::{goal_progress_percent, ActivityRow, LocationSample, RunSnapshot, RunSummary};
pub use tracker::{CountdownStep, RunTracker, TickOutcome, DEFAULT_COUNTDOWN_SECS, RUN_TITLE};
