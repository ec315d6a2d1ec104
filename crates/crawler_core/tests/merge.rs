use std::collections::BTreeMap;

use crawler_core::{CollectionKind, PanelConfig, PersistedConfigRecord, Platform, RECORD_VERSION};
use pretty_assertions::assert_eq;

fn record(version: u32, params: &[(&str, f64)]) -> PersistedConfigRecord {
    PersistedConfigRecord {
        version,
        params: params
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect(),
        keywords: BTreeMap::new(),
    }
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    crawler_logging::initialize_for_tests();
    let merged = PanelConfig::merge(Platform::YouTube, record(0, &[("sample_video_count", 25.0)]));

    assert_eq!(merged.params.get("sample_video_count"), Some(25.0));
    assert_eq!(merged.params.get("max_retries"), Some(3.0));
    assert_eq!(merged.params.get("like_weight"), Some(0.4));
    assert_eq!(merged.keywords, PanelConfig::defaults(Platform::YouTube).keywords);
}

#[test]
fn unknown_keys_survive_the_merge() {
    let mut persisted = record(RECORD_VERSION, &[("legacy_knob", 12.5)]);
    persisted
        .keywords
        .insert("future_list".to_string(), vec!["a".to_string()]);

    let merged = PanelConfig::merge(Platform::GitHub, persisted);
    assert_eq!(merged.params.get("legacy_knob"), Some(12.5));
    assert_eq!(merged.keywords.get("future_list").unwrap().items(), ["a".to_string()]);

    let written = merged.to_record();
    assert_eq!(written.params.get("legacy_knob"), Some(&12.5));
    assert!(written.keywords.contains_key("future_list"));
}

#[test]
fn out_of_range_values_are_clamped() {
    crawler_logging::initialize_for_tests();
    let merged = PanelConfig::merge(
        Platform::GitHub,
        record(RECORD_VERSION, &[("min_stars", 5.0), ("max_delay", 99.0)]),
    );
    assert_eq!(merged.params.get("min_stars"), Some(10.0));
    assert_eq!(merged.params.get("max_delay"), Some(15.0));
}

#[test]
fn fractional_integer_values_are_rounded() {
    let merged = PanelConfig::merge(
        Platform::YouTube,
        record(RECORD_VERSION, &[("max_retries", 4.6), ("ai_ratio_threshold", 0.35)]),
    );
    assert_eq!(merged.params.get("max_retries"), Some(5.0));
    assert_eq!(merged.params.get("ai_ratio_threshold"), Some(0.35));
}

#[test]
fn unknown_collections_count_in_no_total() {
    let defaults = PanelConfig::defaults(Platform::YouTube);
    let mut persisted = record(RECORD_VERSION, &[]);
    persisted.keywords.insert(
        "blocked_channels".to_string(),
        vec!["spam".to_string(), "bots".to_string()],
    );

    let merged = PanelConfig::merge(Platform::YouTube, persisted);
    let kept = merged.keywords.get("blocked_channels").unwrap();
    assert_eq!(kept.kind(), CollectionKind::Unclassified);
    assert_eq!(kept.len(), 2);
    for kind in [CollectionKind::Search, CollectionKind::Exclusion] {
        assert_eq!(merged.keywords.total(kind), defaults.keywords.total(kind));
    }
}

#[test]
fn broken_linked_pair_is_repaired_from_first_member() {
    let merged = PanelConfig::merge(
        Platform::YouTube,
        record(RECORD_VERSION, &[("like_weight", 0.9), ("comment_weight", 0.9)]),
    );
    assert_eq!(merged.params.get("like_weight"), Some(0.9));
    assert!((merged.params.get("comment_weight").unwrap() - 0.1).abs() < 1e-12);
    assert!(merged.params.links_hold());
}

#[test]
fn newer_record_version_is_still_merged() {
    crawler_logging::initialize_for_tests();
    let merged = PanelConfig::merge(
        Platform::YouTube,
        record(RECORD_VERSION + 1, &[("max_qualified_kols", 500.0)]),
    );
    assert_eq!(merged.params.get("max_qualified_kols"), Some(500.0));
}

#[test]
fn persisted_collections_replace_defaults_and_keep_order() {
    let mut persisted = record(RECORD_VERSION, &[]);
    persisted.keywords.insert(
        "priority_high".to_string(),
        vec!["Veo".to_string(), "Sora AI".to_string(), "Veo".to_string()],
    );

    let merged = PanelConfig::merge(Platform::YouTube, persisted);
    assert_eq!(
        merged.keywords.get("priority_high").unwrap().items(),
        ["Veo".to_string(), "Sora AI".to_string()]
    );
    let names: Vec<_> = merged.keywords.iter().map(|c| c.name().to_string()).collect();
    assert_eq!(
        names,
        [
            "priority_high",
            "priority_medium",
            "priority_low",
            "course_keywords",
            "competitor_names"
        ]
    );
}

#[test]
fn saved_config_merges_back_unchanged() {
    let mut config = PanelConfig::defaults(Platform::YouTube);
    config
        .params
        .set_linked("engagement_weights", "like_weight", 0.7)
        .unwrap();
    config.params.set("sample_video_count", 35.0).unwrap();
    config.keywords.add("priority_low", "Flux").unwrap();
    config.keywords.remove("competitor_names", "openai").unwrap();

    let merged = PanelConfig::merge(Platform::YouTube, config.to_record());
    assert_eq!(merged, config);
}
