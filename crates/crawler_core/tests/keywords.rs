use crawler_core::{CollectionKind, ConsoleError, KeywordCollection, KeywordSets, Platform};

#[test]
fn duplicate_add_is_rejected_and_length_is_unchanged() {
    let mut collection = KeywordCollection::new("priority_high", CollectionKind::Search);
    collection.add("Sora AI").unwrap();

    let err = collection.add("Sora AI").unwrap_err();
    assert_eq!(
        err,
        ConsoleError::DuplicateEntry {
            collection: "priority_high".to_string(),
            text: "Sora AI".to_string(),
        }
    );
    assert_eq!(collection.len(), 1);
}

#[test]
fn add_trims_before_membership_test() {
    let mut collection = KeywordCollection::new("search_keywords", CollectionKind::Search);
    let items = collection.add("  ComfyUI \t").unwrap();
    assert_eq!(items, ["ComfyUI".to_string()]);

    assert!(matches!(
        collection.add("ComfyUI  "),
        Err(ConsoleError::DuplicateEntry { .. })
    ));
    assert_eq!(collection.len(), 1);
}

#[test]
fn membership_is_case_sensitive() {
    let mut collection = KeywordCollection::new("c", CollectionKind::Search);
    collection.add("LoRA").unwrap();
    collection.add("lora").unwrap();
    assert_eq!(collection.items(), ["LoRA".to_string(), "lora".to_string()]);
}

#[test]
fn blank_input_is_rejected() {
    let mut collection = KeywordCollection::new("c", CollectionKind::Exclusion);
    assert_eq!(collection.add("   "), Err(ConsoleError::EmptyInput));
    assert!(collection.is_empty());
}

#[test]
fn remove_absent_is_a_silent_noop() {
    let mut collection = KeywordCollection::from_items("c", CollectionKind::Search, ["a", "b"]);
    assert!(!collection.remove("z"));
    assert_eq!(collection.len(), 2);

    assert!(collection.remove("a"));
    assert_eq!(collection.items(), ["b".to_string()]);
    assert!(!collection.contains("a"));
    // Removed entries can be added again.
    collection.add("a").unwrap();
    assert_eq!(collection.items(), ["b".to_string(), "a".to_string()]);
}

#[test]
fn from_items_drops_later_duplicates() {
    let collection = KeywordCollection::from_items("c", CollectionKind::Search, ["x", "y", "x"]);
    assert_eq!(collection.items(), ["x".to_string(), "y".to_string()]);
}

#[test]
fn platform_defaults_are_populated() {
    let youtube = KeywordSets::defaults(Platform::YouTube);
    let high = youtube.get("priority_high").unwrap();
    assert_eq!(high.items()[0], "Sora AI");
    assert_eq!(youtube.total(CollectionKind::Search), 15);
    assert_eq!(youtube.total(CollectionKind::Exclusion), 10);

    let github = KeywordSets::defaults(Platform::GitHub);
    assert_eq!(github.iter().count(), 5);
    assert!(github.get("exclusion_organizations").unwrap().contains("anthropic"));
}

#[test]
fn unknown_collection_is_reported() {
    let mut sets = KeywordSets::defaults(Platform::GitHub);
    assert_eq!(
        sets.add("nope", "x"),
        Err(ConsoleError::UnknownCollection("nope".to_string()))
    );
    assert_eq!(
        sets.remove("nope", "x"),
        Err(ConsoleError::UnknownCollection("nope".to_string()))
    );
}
