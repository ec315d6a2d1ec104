use std::fmt;

use crawler_logging::{crawler_info, crawler_warn};

use crate::debounce::TimerToken;
use crate::{ConsoleError, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Starting => "starting",
            RunState::Running => "running",
            RunState::Stopping => "stopping",
        })
    }
}

/// Remote status as validated at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub running: bool,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCommand {
    Start(Platform),
    Stop,
}

/// Sole owner of the global crawler run state.
///
/// Optimistic transitions (`Starting`, `Stopping`) are only taken after the
/// remote accepted the command, and they are trusted over contradicting
/// polls until the grace timer fires. Outside a grace window the latest
/// successful poll is the truth.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSynchronizer {
    state: RunState,
    active_platform: Option<Platform>,
    in_flight: Option<PendingCommand>,
    grace_token: TimerToken,
    grace_armed: bool,
    unconfirmed: bool,
    poll_in_flight: bool,
    failed_polls: u32,
    last_report: Option<StatusReport>,
}

impl RunSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn active_platform(&self) -> Option<Platform> {
        self.active_platform
    }

    pub fn in_flight(&self) -> Option<PendingCommand> {
        self.in_flight
    }

    /// Set after a grace timeout forced the state back to idle.
    pub fn unconfirmed(&self) -> bool {
        self.unconfirmed
    }

    pub fn failed_polls(&self) -> u32 {
        self.failed_polls
    }

    pub fn last_report(&self) -> Option<&StatusReport> {
        self.last_report.as_ref()
    }

    /// Configuration edits are only allowed while fully idle, with no start
    /// or stop awaiting a response.
    pub fn is_locked(&self) -> bool {
        self.state != RunState::Idle || self.in_flight.is_some()
    }

    pub fn request_start(&mut self, platform: Platform) -> Result<(), ConsoleError> {
        match self.state {
            RunState::Running => return Err(ConsoleError::AlreadyRunning),
            RunState::Starting | RunState::Stopping => return Err(ConsoleError::AlreadyTransitioning),
            RunState::Idle => {}
        }
        if self.in_flight.is_some() {
            return Err(ConsoleError::AlreadyTransitioning);
        }
        self.in_flight = Some(PendingCommand::Start(platform));
        Ok(())
    }

    pub fn request_stop(&mut self) -> Result<(), ConsoleError> {
        match self.state {
            RunState::Idle => return Err(ConsoleError::NotRunning),
            RunState::Starting | RunState::Stopping => return Err(ConsoleError::AlreadyTransitioning),
            RunState::Running => {}
        }
        if self.in_flight.is_some() {
            return Err(ConsoleError::AlreadyTransitioning);
        }
        self.in_flight = Some(PendingCommand::Stop);
        Ok(())
    }

    /// Remote accepted the start. Returns the grace token to schedule.
    pub fn start_accepted(&mut self) -> Option<TimerToken> {
        let platform = match self.in_flight.take() {
            Some(PendingCommand::Start(platform)) => platform,
            other => {
                self.in_flight = other;
                return None;
            }
        };
        if self.state != RunState::Idle {
            // A poll already saw the crawler running.
            self.active_platform.get_or_insert(platform);
            return None;
        }
        self.active_platform = Some(platform);
        self.unconfirmed = false;
        self.transition(RunState::Starting);
        Some(self.arm_grace())
    }

    pub fn start_failed(&mut self) {
        if matches!(self.in_flight, Some(PendingCommand::Start(_))) {
            self.in_flight = None;
        }
    }

    /// Remote accepted the stop. Returns the grace token to schedule.
    pub fn stop_accepted(&mut self) -> Option<TimerToken> {
        if self.in_flight != Some(PendingCommand::Stop) {
            return None;
        }
        self.in_flight = None;
        if self.state != RunState::Running {
            return None;
        }
        self.unconfirmed = false;
        self.transition(RunState::Stopping);
        Some(self.arm_grace())
    }

    pub fn stop_failed(&mut self) {
        if self.in_flight == Some(PendingCommand::Stop) {
            self.in_flight = None;
        }
    }

    /// Returns false if a poll is already outstanding.
    pub fn begin_poll(&mut self) -> bool {
        if self.poll_in_flight {
            return false;
        }
        self.poll_in_flight = true;
        true
    }

    pub fn poll_succeeded(&mut self, report: StatusReport) -> Option<RunState> {
        self.poll_in_flight = false;
        self.failed_polls = 0;
        self.unconfirmed = false;
        let running = report.running;
        self.last_report = Some(report);

        let next = match (self.state, running) {
            (RunState::Starting, true) => RunState::Running,
            (RunState::Stopping, false) => RunState::Idle,
            // Optimistic state wins until the grace timer fires.
            (RunState::Starting, false) | (RunState::Stopping, true) => return None,
            (RunState::Running, false) => RunState::Idle,
            (RunState::Idle, true) => RunState::Running,
            (RunState::Running, true) | (RunState::Idle, false) => return None,
        };
        self.disarm_grace();
        if next == RunState::Idle {
            self.active_platform = None;
        }
        self.transition(next);
        Some(next)
    }

    /// A lost poll keeps the last known state.
    pub fn poll_failed(&mut self, reason: &str) {
        self.poll_in_flight = false;
        self.failed_polls += 1;
        crawler_warn!(
            "Status poll failed ({} in a row), keeping state {}: {}",
            self.failed_polls,
            self.state,
            reason
        );
    }

    /// Grace timer fired. Returns the timeout error if it still applied.
    pub fn grace_elapsed(&mut self, token: TimerToken) -> Option<ConsoleError> {
        if !self.grace_armed || token != self.grace_token {
            return None;
        }
        self.disarm_grace();
        let err = match self.state {
            RunState::Starting => ConsoleError::StartTimedOut,
            RunState::Stopping => ConsoleError::StopTimedOut,
            RunState::Idle | RunState::Running => return None,
        };
        self.unconfirmed = true;
        self.active_platform = None;
        self.transition(RunState::Idle);
        Some(err)
    }

    fn arm_grace(&mut self) -> TimerToken {
        self.grace_token += 1;
        self.grace_armed = true;
        self.grace_token
    }

    fn disarm_grace(&mut self) {
        self.grace_token += 1;
        self.grace_armed = false;
    }

    fn transition(&mut self, next: RunState) {
        if self.state != next {
            crawler_info!("Run state {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
