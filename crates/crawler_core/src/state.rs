use std::collections::BTreeMap;
use std::time::Duration;

use crate::view_model::{AppViewModel, CollectionView, PanelView, ParamRowView};
use crate::{
    catalog, CollectionKind, Notice, PanelState, PendingCommand, Platform, RunState,
    RunSynchronizer,
};

/// Timing and behavior knobs of the synchronization engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Render-frame coalescing delay.
    pub frame_delay: Duration,
    /// Input inactivity required before a slider value commits.
    pub quiet_period: Duration,
    /// How long an optimistic run state is trusted over polls.
    pub grace_period: Duration,
    /// Also push saved records to the remote `config` endpoint.
    pub mirror_remote: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            frame_delay: Duration::from_millis(16),
            quiet_period: Duration::from_millis(300),
            grace_period: Duration::from_secs(20),
            mirror_remote: false,
        }
    }
}

/// Crawler counters of one platform, normalized across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformStatistics {
    pub total: u64,
    pub qualified: u64,
    pub pending_analysis: u64,
    pub pending_expansions: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    settings: SyncSettings,
    panels: BTreeMap<Platform, PanelState>,
    sync: RunSynchronizer,
    notices: Vec<Notice>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(SyncSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SyncSettings) -> Self {
        let panels = Platform::ALL
            .iter()
            .map(|platform| (*platform, PanelState::new(*platform)))
            .collect();
        Self {
            settings,
            panels,
            sync: RunSynchronizer::new(),
            notices: Vec::new(),
            dirty: false,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn panel(&self, platform: Platform) -> &PanelState {
        &self.panels[&platform]
    }

    pub(crate) fn panel_mut(&mut self, platform: Platform) -> &mut PanelState {
        self.panels
            .entry(platform)
            .or_insert_with(|| PanelState::new(platform))
    }

    pub fn sync(&self) -> &RunSynchronizer {
        &self.sync
    }

    pub(crate) fn sync_mut(&mut self) -> &mut RunSynchronizer {
        &mut self.sync
    }

    pub fn run_state(&self) -> RunState {
        self.sync.state()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        self.dirty = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let state = self.sync.state();
        let locked = self.sync.is_locked();
        let in_flight = self.sync.in_flight();
        AppViewModel {
            run_state: state,
            active_platform: self.sync.active_platform(),
            command_in_flight: in_flight.is_some(),
            unconfirmed: self.sync.unconfirmed(),
            failed_polls: self.sync.failed_polls(),
            last_status_at: self
                .sync
                .last_report()
                .and_then(|report| report.timestamp.clone()),
            can_start: state == RunState::Idle && in_flight.is_none(),
            can_stop: state == RunState::Running && in_flight != Some(PendingCommand::Stop),
            panels: self
                .panels
                .values()
                .map(|panel| panel_view(panel, locked))
                .collect(),
            dirty: self.dirty,
        }
    }
}

fn panel_view(panel: &PanelState, locked: bool) -> PanelView {
    let config = panel.config();
    let params = catalog(panel.platform())
        .iter()
        .map(|spec| {
            let value = config.params.get(spec.key).unwrap_or(spec.default);
            let display_value = panel.display_value(spec.key).unwrap_or(value);
            ParamRowView {
                key: spec.key.to_string(),
                label: spec.label.to_string(),
                value,
                display_value,
                display: spec.format_value(display_value),
                min: spec.min,
                max: spec.max,
                step: spec.step,
                pending: panel.has_pending_input(spec.key),
            }
        })
        .collect();
    let collections = config
        .keywords
        .iter()
        .map(|collection| CollectionView {
            name: collection.name().to_string(),
            kind: collection.kind(),
            items: collection.items().to_vec(),
        })
        .collect();

    PanelView {
        platform: panel.platform(),
        loaded: panel.is_loaded(),
        unsaved: panel.is_unsaved(),
        saving: panel.is_saving(),
        editable: !locked,
        params,
        collections,
        search_total: config.keywords.total(CollectionKind::Search),
        exclusion_total: config.keywords.total(CollectionKind::Exclusion),
        statistics: panel.statistics().copied(),
    }
}
