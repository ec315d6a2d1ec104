use std::time::Duration;

use crate::debounce::TimerToken;
use crate::{PanelConfig, ParameterSet, Platform};

/// A timer the runtime must fire back as `Msg::TimerFired` after its delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timer {
    /// Render-frame coalescing boundary of a debounce stream.
    Frame {
        platform: Platform,
        stream: String,
        token: TimerToken,
    },
    /// Quiet period of a debounce stream.
    Quiet {
        platform: Platform,
        stream: String,
        token: TimerToken,
    },
    /// Optimistic run-state grace window.
    Grace { token: TimerToken },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadConfig { platform: Platform },
    SaveConfig { platform: Platform, config: PanelConfig },
    MirrorConfig { platform: Platform, config: PanelConfig },
    DispatchStart { platform: Platform, params: ParameterSet },
    DispatchStop,
    PollStatus,
    FetchStatistics { platform: Platform },
    Schedule { timer: Timer, delay: Duration },
}
