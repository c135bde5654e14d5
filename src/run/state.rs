use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    /// 3-2-1 before tracking begins
    Countdown,
    Tracking,
    Paused,
    /// Finish button held down, waiting for the hold to complete
    Finalizing,
    Completed,
    Cancelled,
}

/// Inputs that move a run between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCommand {
    Start,
    CountdownElapsed,
    Pause,
    Resume,
    HoldStart,
    HoldRelease,
    HoldComplete,
    Cancel,
}

impl RunState {
    /// Transition table. Anything not listed is rejected.
    pub fn transition(self, command: RunCommand) -> Result<RunState> {
        use RunCommand::*;
        use RunState::*;

        let next = match (self, command) {
            (Idle, Start) => Countdown,
            (Countdown, CountdownElapsed) => Tracking,
            (Tracking, Pause) => Paused,
            (Paused, Resume) => Tracking,
            (Paused, HoldStart) => Finalizing,
            (Finalizing, HoldRelease) => Paused,
            (Finalizing, HoldComplete) => Completed,
            (state, Cancel) if !state.is_terminal() => Cancelled,
            (state, command) => {
                anyhow::bail!("cannot apply {:?} while run is {:?}", command, state)
            }
        };

        Ok(next)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled)
    }

    /// Whether the per-second tracking tick should run
    pub fn is_ticking(self) -> bool {
        self == RunState::Tracking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() -> Result<()> {
        let state = RunState::Idle
            .transition(RunCommand::Start)?
            .transition(RunCommand::CountdownElapsed)?
            .transition(RunCommand::Pause)?
            .transition(RunCommand::HoldStart)?
            .transition(RunCommand::HoldComplete)?;

        assert_eq!(state, RunState::Completed);
        Ok(())
    }

    #[test]
    fn test_countdown_cannot_be_paused() {
        assert!(RunState::Countdown.transition(RunCommand::Pause).is_err());
    }

    #[test]
    fn test_hold_requires_pause() {
        assert!(RunState::Tracking.transition(RunCommand::HoldStart).is_err());
    }

    #[test]
    fn test_release_returns_to_paused() -> Result<()> {
        assert_eq!(RunState::Finalizing.transition(RunCommand::HoldRelease)?, RunState::Paused);
        Ok(())
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for state in [RunState::Completed, RunState::Cancelled] {
            assert!(state.transition(RunCommand::Cancel).is_err());
            assert!(state.transition(RunCommand::Resume).is_err());
        }
    }

    #[test]
    fn test_cancel_from_any_live_state() -> Result<()> {
        for state in [
            RunState::Idle,
            RunState::Countdown,
            RunState::Tracking,
            RunState::Paused,
            RunState::Finalizing,
        ] {
            assert_eq!(state.transition(RunCommand::Cancel)?, RunState::Cancelled);
        }
        Ok(())
    }
}
