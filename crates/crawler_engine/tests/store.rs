use std::fs;
use std::sync::Arc;

use crawler_core::{PanelConfig, Platform, RECORD_VERSION};
use crawler_engine::{ConfigStore, FileStore, KeyValueStore, MemoryStore, PersistError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn edited(platform: Platform) -> PanelConfig {
    let mut config = PanelConfig::defaults(platform);
    match platform {
        Platform::YouTube => {
            config
                .params
                .set_linked("engagement_weights", "comment_weight", 0.35)
                .unwrap();
            config.keywords.add("priority_high", "Hailuo").unwrap();
            config.keywords.remove("course_keywords", "第").unwrap();
        }
        Platform::GitHub => {
            config.params.set("min_delay", 2.5).unwrap();
            config.keywords.add("search_keywords", "flux").unwrap();
        }
    }
    config
}

#[test]
fn file_store_round_trips_every_platform() {
    crawler_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let files = FileStore::new(temp.path().join("data"));
    let store = ConfigStore::new(Arc::new(files.clone()));

    for platform in Platform::ALL {
        let config = edited(platform);
        store.save(platform, &config).unwrap();
        assert!(files.path_for(&platform.config_key()).is_file());
        assert_eq!(store.load(platform).unwrap(), config);
    }
    assert!(temp.path().join("data").join("youtube_config.ron").is_file());
}

#[test]
fn missing_record_loads_defaults() {
    let store = ConfigStore::new(Arc::new(MemoryStore::new()));
    assert_eq!(
        store.load(Platform::GitHub).unwrap(),
        PanelConfig::defaults(Platform::GitHub)
    );
}

#[test]
fn corrupt_record_is_reported() {
    crawler_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("youtube_config.ron"), "{ not ron").unwrap();

    let store = ConfigStore::new(Arc::new(FileStore::new(temp.path().to_path_buf())));
    let err = store.load(Platform::YouTube).unwrap_err();
    assert!(matches!(err, PersistError::Decode { ref key, .. } if key == "youtube_config"));
}

#[test]
fn legacy_record_without_version_is_merged() {
    let memory = Arc::new(MemoryStore::new());
    memory
        .put(
            "youtube_config",
            r#"(params: {"max_retries": 7.0}, keywords: {"priority_low": ["Flux"]})"#,
        )
        .unwrap();

    let config = ConfigStore::new(memory).load(Platform::YouTube).unwrap();
    assert_eq!(config.params.get("max_retries"), Some(7.0));
    assert_eq!(config.params.get("max_qualified_kols"), Some(1000.0));
    assert_eq!(
        config.keywords.get("priority_low").unwrap().items(),
        ["Flux".to_string()]
    );
    assert_eq!(config.to_record().version, RECORD_VERSION);
}

#[test]
fn failed_write_keeps_previous_record() {
    let memory = Arc::new(MemoryStore::new());
    let store = ConfigStore::new(memory.clone());
    let first = edited(Platform::GitHub);
    store.save(Platform::GitHub, &first).unwrap();

    memory.set_fail_writes(true);
    let mut second = first.clone();
    second.params.set("min_stars", 900.0).unwrap();
    assert!(store.save(Platform::GitHub, &second).is_err());

    assert_eq!(store.load(Platform::GitHub).unwrap(), first);
}
