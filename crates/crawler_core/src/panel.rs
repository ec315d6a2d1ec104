use std::collections::BTreeMap;

use crawler_logging::crawler_debug;

use crate::debounce::{DebounceStep, DebounceStream, TimerToken};
use crate::linked::pair_of;
use crate::params::param_spec;
use crate::{ConsoleError, PanelConfig, Platform, PlatformStatistics};

/// Pending input of one stream: which member was moved, and to what.
pub(crate) type PendingValue = (String, f64);

/// Editing state of one platform's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    platform: Platform,
    pub(crate) config: PanelConfig,
    pub(crate) loaded: bool,
    pub(crate) load_requested: bool,
    /// Bumped on every committed change.
    revision: u64,
    saved_revision: u64,
    /// Snapshot being written, with the revision it was taken at.
    pub(crate) saving: Option<(u64, PanelConfig)>,
    display: BTreeMap<String, f64>,
    streams: BTreeMap<String, DebounceStream<PendingValue>>,
    pub(crate) statistics: Option<PlatformStatistics>,
}

impl PanelState {
    pub fn new(platform: Platform) -> Self {
        let config = PanelConfig::defaults(platform);
        let display = config.params.values().clone();
        Self {
            platform,
            config,
            loaded: false,
            load_requested: false,
            revision: 0,
            saved_revision: 0,
            saving: None,
            display,
            streams: BTreeMap::new(),
            statistics: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// True when committed changes have not been saved yet.
    pub fn is_unsaved(&self) -> bool {
        self.revision != self.saved_revision
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_some()
    }

    /// Value shown to the operator, which may run ahead of the committed one.
    pub fn display_value(&self, key: &str) -> Option<f64> {
        self.display.get(key).copied()
    }

    pub fn has_pending_input(&self, key: &str) -> bool {
        self.streams
            .values()
            .any(|stream| stream.pending().is_some_and(|(member, _)| member == key))
    }

    pub fn statistics(&self) -> Option<&PlatformStatistics> {
        self.statistics.as_ref()
    }

    pub(crate) fn replace_config(&mut self, config: PanelConfig) {
        for stream in self.streams.values_mut() {
            stream.cancel();
        }
        self.display = config.params.values().clone();
        self.config = config;
        self.loaded = true;
        self.revision = 0;
        self.saved_revision = 0;
        // A save still in flight belongs to the replaced config.
        self.saving = None;
    }

    pub(crate) fn mark_changed(&mut self) {
        self.revision += 1;
    }

    pub(crate) fn begin_save(&mut self) -> PanelConfig {
        let snapshot = self.config.clone();
        self.saving = Some((self.revision, snapshot.clone()));
        snapshot
    }

    /// Returns the saved snapshot on success.
    pub(crate) fn finish_save(&mut self, ok: bool) -> Option<PanelConfig> {
        let (revision, snapshot) = self.saving.take()?;
        if ok {
            self.saved_revision = revision;
            Some(snapshot)
        } else {
            None
        }
    }

    /// Feed one raw slider value into its debounce stream.
    ///
    /// The display value changes immediately; the returned token must be
    /// scheduled as a frame timer for `stream`.
    pub(crate) fn submit(
        &mut self,
        key: &str,
        raw: f64,
    ) -> Result<(String, TimerToken, Option<ConsoleError>), ConsoleError> {
        let spec = param_spec(self.platform, key)
            .ok_or_else(|| ConsoleError::UnknownParameter(key.to_string()))?;
        let value = spec.clamp(raw);
        let in_range = (spec.min..=spec.max).contains(&raw);
        let warning = (!in_range).then(|| ConsoleError::ValueClamped {
            key: key.to_string(),
            raw,
            clamped: value,
        });

        self.display.insert(key.to_string(), value);
        let stream_id = match pair_of(self.platform, key) {
            Some(pair) => {
                if let Some(partner) = pair.partner_of(key) {
                    self.display.insert(partner.to_string(), 1.0 - value);
                }
                pair.id.to_string()
            }
            None => key.to_string(),
        };

        let token = self
            .streams
            .entry(stream_id.clone())
            .or_default()
            .submit((key.to_string(), value));
        Ok((stream_id, token, warning))
    }

    pub(crate) fn frame_elapsed(&mut self, stream_id: &str, token: TimerToken) -> Option<TimerToken> {
        match self.streams.get_mut(stream_id)?.frame_elapsed(token) {
            DebounceStep::ScheduleQuiet(next) => Some(next),
            _ => None,
        }
    }

    pub(crate) fn quiet_elapsed(&mut self, stream_id: &str, token: TimerToken) -> Option<PendingValue> {
        match self.streams.get_mut(stream_id)?.quiet_elapsed(token) {
            DebounceStep::Commit(value) => Some(value),
            _ => None,
        }
    }

    /// Commit everything still waiting in a debounce stream.
    pub(crate) fn flush_pending(&mut self) -> Vec<PendingValue> {
        self.streams
            .values_mut()
            .filter_map(|stream| match stream.flush() {
                DebounceStep::Commit(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    /// Write a debounced value into the parameter set.
    ///
    /// Returns `Ok(true)` if the value changed. A commit equal to the current
    /// value is a no-op.
    pub(crate) fn commit(&mut self, key: &str, value: f64) -> Result<bool, ConsoleError> {
        if self.config.params.get(key) == Some(value) {
            return Ok(false);
        }
        match pair_of(self.platform, key) {
            Some(pair) => {
                let update = self.config.params.set_linked(pair.id, key, value)?;
                self.display.insert(update.member.to_string(), update.value);
                self.display.insert(update.partner.to_string(), update.partner_value);
            }
            None => {
                let stored = self.config.params.set(key, value)?;
                self.display.insert(key.to_string(), stored);
            }
        }
        crawler_debug!("{} commit {}={}", self.platform, key, value);
        self.mark_changed();
        Ok(true)
    }

    /// Drop a commit that arrived while locked and show the committed value again.
    pub(crate) fn reject_commit(&mut self, key: &str) {
        let mut keys = vec![key.to_string()];
        if let Some(partner) = pair_of(self.platform, key).and_then(|pair| pair.partner_of(key)) {
            keys.push(partner.to_string());
        }
        for key in keys {
            if let Some(committed) = self.config.params.get(&key) {
                self.display.insert(key, committed);
            }
        }
    }

    pub(crate) fn set_linked(
        &mut self,
        pair_id: &str,
        member: &str,
        raw: f64,
    ) -> Result<bool, ConsoleError> {
        let before = self.config.params.clone();
        let update = self.config.params.set_linked(pair_id, member, raw)?;
        if let Some(stream) = self.streams.get_mut(pair_id) {
            stream.cancel();
        }
        self.display.insert(update.member.to_string(), update.value);
        self.display.insert(update.partner.to_string(), update.partner_value);
        let changed = before != self.config.params;
        if changed {
            self.mark_changed();
        }
        Ok(changed)
    }
}
