use std::collections::BTreeMap;

use crate::{ConsoleError, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Plain,
    /// Stored as a 0..1 fraction, shown as a percentage.
    Percent,
    /// Shown with an `x` suffix, e.g. `1.3x`.
    Multiplier,
}

/// Static metadata for one tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub kind: ValueKind,
    pub format: ValueFormat,
    pub unit: Option<&'static str>,
}

impl ParamSpec {
    const fn int(key: &'static str, label: &'static str, default: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            key,
            label,
            min,
            max,
            step,
            default,
            kind: ValueKind::Integer,
            format: ValueFormat::Plain,
            unit: None,
        }
    }

    const fn float(key: &'static str, label: &'static str, default: f64, min: f64, max: f64, step: f64) -> Self {
        Self {
            key,
            label,
            min,
            max,
            step,
            default,
            kind: ValueKind::Float,
            format: ValueFormat::Plain,
            unit: None,
        }
    }

    const fn percent(self) -> Self {
        Self {
            format: ValueFormat::Percent,
            ..self
        }
    }

    const fn multiplier(self) -> Self {
        Self {
            format: ValueFormat::Multiplier,
            ..self
        }
    }

    const fn unit(self, unit: &'static str) -> Self {
        Self {
            unit: Some(unit),
            ..self
        }
    }

    /// Clamp a raw value into `[min, max]`. Non-finite input maps to `min`.
    ///
    /// Integer parameters are rounded to the nearest whole number, so the
    /// stored value is exactly what goes over the wire.
    pub fn clamp(&self, raw: f64) -> f64 {
        if !raw.is_finite() {
            return self.min;
        }
        let value = raw.clamp(self.min, self.max);
        match self.kind {
            ValueKind::Integer => value.round(),
            ValueKind::Float => value,
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        let body = match (self.format, self.kind) {
            (ValueFormat::Percent, _) => format!("{:.0}%", value * 100.0),
            (ValueFormat::Multiplier, _) => format!("{value:.1}x"),
            (ValueFormat::Plain, ValueKind::Integer) => format!("{}", value.round() as i64),
            (ValueFormat::Plain, ValueKind::Float) => format!("{value}"),
        };
        match self.unit {
            Some(unit) => format!("{body}{unit}"),
            None => body,
        }
    }
}

const YOUTUBE_PARAMS: &[ParamSpec] = &[
    ParamSpec::float("ai_ratio_threshold", "AI content ratio threshold", 0.3, 0.1, 1.0, 0.05).percent(),
    ParamSpec::int("sample_video_count", "Sampled videos", 10.0, 5.0, 50.0, 5.0),
    ParamSpec::int("search_results_per_keyword", "Search results per keyword", 5.0, 1.0, 20.0, 1.0),
    ParamSpec::int("expand_batch_size", "Expansion batch size", 3.0, 1.0, 10.0, 1.0),
    ParamSpec::int("expand_recommended_videos", "Recommended videos per expansion", 10.0, 5.0, 50.0, 5.0),
    ParamSpec::int("update_recent_videos", "Recent videos on update", 10.0, 5.0, 50.0, 5.0),
    ParamSpec::int("max_qualified_kols", "Max qualified KOLs", 1000.0, 100.0, 10000.0, 100.0),
    ParamSpec::int("rate_limit_delay", "Rate limit delay", 2.0, 1.0, 10.0, 1.0).unit("s"),
    ParamSpec::int("max_retries", "Max retries", 3.0, 1.0, 10.0, 1.0),
    ParamSpec::int("active_days_threshold", "Active days threshold", 90.0, 30.0, 365.0, 30.0).unit(" days"),
    ParamSpec::float("like_weight", "Like weight", 0.4, 0.0, 1.0, 0.1).percent(),
    ParamSpec::float("comment_weight", "Comment weight", 0.6, 0.0, 1.0, 0.1).percent(),
];

const GITHUB_PARAMS: &[ParamSpec] = &[
    ParamSpec::int("min_followers", "Min followers", 100.0, 10.0, 1000.0, 10.0),
    ParamSpec::int("min_stars", "Min stars", 100.0, 10.0, 1000.0, 10.0),
    ParamSpec::int("min_repo_stars", "Min repository stars", 100.0, 10.0, 500.0, 10.0),
    ParamSpec::int("max_developers_per_run", "Target developers per run", 300.0, 50.0, 1000.0, 50.0),
    ParamSpec::float("min_delay", "Min delay", 4.0, 1.0, 15.0, 0.5).unit("s"),
    ParamSpec::float("max_delay", "Max delay", 7.0, 1.0, 15.0, 0.5).unit("s"),
    ParamSpec::int("initial_cooldown", "Initial cooldown", 5.0, 1.0, 30.0, 1.0).unit("s"),
    ParamSpec::int("max_429_backoff", "Max 429 backoff", 30.0, 10.0, 120.0, 10.0).unit("s"),
    ParamSpec::int("academic_min_followers", "Academic min followers", 50.0, 10.0, 500.0, 10.0),
    ParamSpec::int("academic_min_stars", "Academic min stars", 100.0, 10.0, 500.0, 10.0),
    ParamSpec::float("discovery_buffer_ratio", "Discovery buffer ratio", 1.3, 1.0, 2.0, 0.1).multiplier(),
    ParamSpec::int("max_discovery_per_batch", "Max discovery per batch", 50.0, 5.0, 100.0, 5.0),
    ParamSpec::int("min_discovery_per_batch", "Min discovery per batch", 10.0, 5.0, 100.0, 5.0),
];

/// Canonical parameter catalog for a platform, in display order.
pub fn catalog(platform: Platform) -> &'static [ParamSpec] {
    match platform {
        Platform::YouTube => YOUTUBE_PARAMS,
        Platform::GitHub => GITHUB_PARAMS,
    }
}

pub fn param_spec(platform: Platform, key: &str) -> Option<&'static ParamSpec> {
    catalog(platform).iter().find(|spec| spec.key == key)
}

/// Live numeric configuration of one platform.
///
/// Keys from the catalog are always present and always in range. Keys that
/// arrived from a persisted record but are unknown to the catalog are kept
/// as-is so a newer record survives a round trip through an older console.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    platform: Platform,
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    pub fn defaults(platform: Platform) -> Self {
        let values = catalog(platform)
            .iter()
            .map(|spec| (spec.key.to_string(), spec.default))
            .collect();
        Self { platform, values }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn spec(&self, key: &str) -> Option<&'static ParamSpec> {
        param_spec(self.platform, key)
    }

    /// Clamp and store a catalog parameter. Returns the stored value.
    pub fn set(&mut self, key: &str, raw: f64) -> Result<f64, ConsoleError> {
        let spec = self
            .spec(key)
            .ok_or_else(|| ConsoleError::UnknownParameter(key.to_string()))?;
        let value = spec.clamp(raw);
        self.values.insert(key.to_string(), value);
        Ok(value)
    }

    /// Write a value without catalog validation. Used when merging records.
    pub(crate) fn insert_raw(&mut self, key: String, value: f64) {
        self.values.insert(key, value);
    }

    pub(crate) fn write_pair(&mut self, first: (&str, f64), second: (&str, f64)) {
        self.values.insert(first.0.to_string(), first.1);
        self.values.insert(second.0.to_string(), second.1);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
