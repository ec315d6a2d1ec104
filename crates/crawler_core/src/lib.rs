//! Crawler console core: pure configuration and run-state synchronization.
//!
//! Nothing in this crate performs IO or reads a clock. All input arrives as
//! [`Msg`] values, all requested work leaves as [`Effect`] values, and timers
//! are modeled as effects carrying validity tokens.
mod debounce;
mod effect;
mod error;
mod keywords;
mod linked;
mod msg;
mod panel;
mod params;
mod platform;
mod record;
mod run_state;
mod state;
mod update;
mod view_model;

pub use debounce::{DebounceStage, DebounceStep, DebounceStream, TimerToken};
pub use effect::{Effect, Timer};
pub use error::{ConsoleError, Notice, NoticeLevel};
pub use keywords::{collection_specs, CollectionKind, CollectionSpec, KeywordCollection, KeywordSets};
pub use linked::{complement, linked_pairs, pair_by_id, pair_of, LinkedPair, LinkedUpdate, LINK_TOLERANCE};
pub use msg::Msg;
pub use panel::PanelState;
pub use params::{catalog, param_spec, ParamSpec, ParameterSet, ValueFormat, ValueKind};
pub use platform::Platform;
pub use record::{PanelConfig, PersistedConfigRecord, RECORD_VERSION};
pub use run_state::{PendingCommand, RunState, RunSynchronizer, StatusReport};
pub use state::{AppState, PlatformStatistics, SyncSettings};
pub use update::update;
pub use view_model::{AppViewModel, CollectionView, PanelView, ParamRowView};
