use crate::{CollectionKind, Platform, PlatformStatistics, RunState};

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub run_state: RunState,
    pub active_platform: Option<Platform>,
    pub command_in_flight: bool,
    /// Last transition was forced by a grace timeout, not seen on the remote.
    pub unconfirmed: bool,
    pub failed_polls: u32,
    pub last_status_at: Option<String>,
    pub can_start: bool,
    pub can_stop: bool,
    pub panels: Vec<PanelView>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn panel(&self, platform: Platform) -> Option<&PanelView> {
        self.panels.iter().find(|panel| panel.platform == platform)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub platform: Platform,
    pub loaded: bool,
    /// Pending-save indicator.
    pub unsaved: bool,
    pub saving: bool,
    pub editable: bool,
    pub params: Vec<ParamRowView>,
    pub collections: Vec<CollectionView>,
    pub search_total: usize,
    pub exclusion_total: usize,
    pub statistics: Option<PlatformStatistics>,
}

impl PanelView {
    pub fn param(&self, key: &str) -> Option<&ParamRowView> {
        self.params.iter().find(|row| row.key == key)
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionView> {
        self.collections.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamRowView {
    pub key: String,
    pub label: String,
    /// Committed value.
    pub value: f64,
    /// Value under the operator's pointer.
    pub display_value: f64,
    /// `display_value` formatted with unit.
    pub display: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView {
    pub name: String,
    pub kind: CollectionKind,
    pub items: Vec<String>,
}
