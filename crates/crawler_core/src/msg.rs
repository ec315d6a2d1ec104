use crate::{PanelConfig, Platform, PlatformStatistics, StatusReport, Timer};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Operator opened a platform panel; loads its config once.
    PanelActivated(Platform),
    /// Durable store answered a load request.
    ConfigLoaded {
        platform: Platform,
        result: Result<PanelConfig, String>,
    },
    /// Raw slider value; fires on every pointer move.
    SliderMoved {
        platform: Platform,
        key: String,
        value: f64,
    },
    /// Exact value typed into one member of a linked pair.
    LinkedValueSet {
        platform: Platform,
        pair: String,
        member: String,
        value: f64,
    },
    KeywordAdded {
        platform: Platform,
        collection: String,
        text: String,
    },
    KeywordRemoved {
        platform: Platform,
        collection: String,
        text: String,
    },
    SaveClicked(Platform),
    SaveCompleted {
        platform: Platform,
        result: Result<(), String>,
    },
    MirrorCompleted {
        platform: Platform,
        result: Result<(), String>,
    },
    StartClicked(Platform),
    StartResponded {
        platform: Platform,
        result: Result<(), String>,
    },
    StopClicked,
    StopResponded { result: Result<(), String> },
    /// Fixed-interval poll timer.
    PollTick,
    /// Operator asked for an immediate re-poll.
    RefreshClicked,
    StatusPolled(Result<StatusReport, String>),
    StatisticsRequested(Platform),
    StatisticsFetched {
        platform: Platform,
        result: Result<PlatformStatistics, String>,
    },
    /// A timer scheduled through `Effect::Schedule` elapsed.
    TimerFired(Timer),
}
