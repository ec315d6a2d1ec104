/// Validity token carried by every scheduled timer.
pub type TimerToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceStage {
    #[default]
    Idle,
    /// Waiting for the next render frame; later input replaces the value.
    Coalescing,
    /// Frame passed; waiting for the quiet period to elapse.
    PendingCommit,
}

/// What the caller must do after feeding the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum DebounceStep<T> {
    ScheduleQuiet(TimerToken),
    Commit(T),
    /// Stale or out-of-order timer; nothing to do.
    Ignored,
}

/// Two-stage debounce for one logical input stream.
///
/// Every transition bumps the token, so any timer scheduled before the
/// transition fires with a stale token and is ignored. A burst of submits
/// therefore yields a single commit of the last value.
#[derive(Debug, Clone, PartialEq)]
pub struct DebounceStream<T> {
    stage: DebounceStage,
    pending: Option<T>,
    token: TimerToken,
}

impl<T> Default for DebounceStream<T> {
    fn default() -> Self {
        Self {
            stage: DebounceStage::Idle,
            pending: None,
            token: 0,
        }
    }
}

impl<T: Clone> DebounceStream<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> DebounceStage {
        self.stage
    }

    pub fn token(&self) -> TimerToken {
        self.token
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Replace any pending value. The returned token must be scheduled as
    /// the next frame timer.
    pub fn submit(&mut self, value: T) -> TimerToken {
        self.token += 1;
        self.stage = DebounceStage::Coalescing;
        self.pending = Some(value);
        self.token
    }

    pub fn frame_elapsed(&mut self, token: TimerToken) -> DebounceStep<T> {
        if token != self.token || self.stage != DebounceStage::Coalescing {
            return DebounceStep::Ignored;
        }
        self.token += 1;
        self.stage = DebounceStage::PendingCommit;
        DebounceStep::ScheduleQuiet(self.token)
    }

    pub fn quiet_elapsed(&mut self, token: TimerToken) -> DebounceStep<T> {
        if token != self.token || self.stage != DebounceStage::PendingCommit {
            return DebounceStep::Ignored;
        }
        self.finish()
    }

    /// Commit whatever is pending right now, skipping the remaining wait.
    pub fn flush(&mut self) -> DebounceStep<T> {
        if self.stage == DebounceStage::Idle {
            return DebounceStep::Ignored;
        }
        self.finish()
    }

    /// Drop pending input and invalidate outstanding timers.
    pub fn cancel(&mut self) {
        self.token += 1;
        self.stage = DebounceStage::Idle;
        self.pending = None;
    }

    fn finish(&mut self) -> DebounceStep<T> {
        self.token += 1;
        self.stage = DebounceStage::Idle;
        match self.pending.take() {
            Some(value) => DebounceStep::Commit(value),
            None => DebounceStep::Ignored,
        }
    }
}
