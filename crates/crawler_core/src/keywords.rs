use std::collections::{BTreeMap, HashSet};

use crate::{ConsoleError, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Terms the crawler searches for.
    Search,
    /// Terms that disqualify a result.
    Exclusion,
    /// Persisted collection unknown to this build. Kept for round trips only.
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: CollectionKind,
    pub defaults: &'static [&'static str],
}

const YOUTUBE_COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec {
        name: "priority_high",
        label: "High priority",
        kind: CollectionKind::Search,
        defaults: &["Sora AI", "Kling AI", "Veo", "Runway", "Seedance"],
    },
    CollectionSpec {
        name: "priority_medium",
        label: "Medium priority",
        kind: CollectionKind::Search,
        defaults: &["ChatGPT", "Claude", "Gemini", "Midjourney", "DALL-E"],
    },
    CollectionSpec {
        name: "priority_low",
        label: "Low priority",
        kind: CollectionKind::Search,
        defaults: &["ComfyUI", "LoRA", "ControlNet", "AI Agent", "Workflow"],
    },
    CollectionSpec {
        name: "course_keywords",
        label: "Course keywords",
        kind: CollectionKind::Exclusion,
        defaults: &["第", "講", "课", "lecture", "lesson", "教程"],
    },
    CollectionSpec {
        name: "competitor_names",
        label: "Competitor names",
        kind: CollectionKind::Exclusion,
        defaults: &["replicate", "runway", "midjourney", "openai"],
    },
];

const GITHUB_COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec {
        name: "search_keywords",
        label: "Search keywords",
        kind: CollectionKind::Search,
        defaults: &[
            "stable diffusion",
            "ComfyUI",
            "text-to-image",
            "text-to-video",
            "image generation",
        ],
    },
    CollectionSpec {
        name: "core_ai_keywords",
        label: "Core AI keywords",
        kind: CollectionKind::Search,
        defaults: &[
            "stable-diffusion",
            "diffusion-model",
            "controlnet",
            "animatediff",
            "lora",
        ],
    },
    CollectionSpec {
        name: "academic_keywords",
        label: "Academic keywords",
        kind: CollectionKind::Search,
        defaults: &["university", "college", "institute", "research", "lab"],
    },
    CollectionSpec {
        name: "research_project_keywords",
        label: "Research project keywords",
        kind: CollectionKind::Exclusion,
        defaults: &["paper", "arxiv", "implementation", "reproduction", "research"],
    },
    CollectionSpec {
        name: "exclusion_organizations",
        label: "Excluded organizations",
        kind: CollectionKind::Exclusion,
        defaults: &["replicate", "runway", "midjourney", "openai", "anthropic"],
    },
];

pub fn collection_specs(platform: Platform) -> &'static [CollectionSpec] {
    match platform {
        Platform::YouTube => YOUTUBE_COLLECTIONS,
        Platform::GitHub => GITHUB_COLLECTIONS,
    }
}

/// Ordered list of unique strings with a hash index for membership tests.
#[derive(Debug, Clone)]
pub struct KeywordCollection {
    name: String,
    kind: CollectionKind,
    items: Vec<String>,
    index: HashSet<String>,
}

impl PartialEq for KeywordCollection {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.kind == other.kind && self.items == other.items
    }
}

impl KeywordCollection {
    pub fn new(name: impl Into<String>, kind: CollectionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            items: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Build from stored items. Later duplicates are dropped.
    pub fn from_items<I, S>(name: impl Into<String>, kind: CollectionKind, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collection = Self::new(name, kind);
        for item in items {
            let item = item.into();
            if collection.index.insert(item.clone()) {
                collection.items.push(item);
            }
        }
        collection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.index.contains(text)
    }

    /// Append a trimmed keyword.
    pub fn add(&mut self, text: &str) -> Result<&[String], ConsoleError> {
        let keyword = text.trim();
        if keyword.is_empty() {
            return Err(ConsoleError::EmptyInput);
        }
        if self.index.contains(keyword) {
            return Err(ConsoleError::DuplicateEntry {
                collection: self.name.clone(),
                text: keyword.to_string(),
            });
        }
        self.index.insert(keyword.to_string());
        self.items.push(keyword.to_string());
        Ok(&self.items)
    }

    /// Remove the first exact match. Returns whether anything was removed.
    pub fn remove(&mut self, text: &str) -> bool {
        if !self.index.remove(text) {
            return false;
        }
        if let Some(position) = self.items.iter().position(|item| item == text) {
            self.items.remove(position);
        }
        true
    }
}

/// All keyword collections of one platform, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordSets {
    collections: Vec<KeywordCollection>,
}

impl KeywordSets {
    pub fn defaults(platform: Platform) -> Self {
        let collections = collection_specs(platform)
            .iter()
            .map(|spec| KeywordCollection::from_items(spec.name, spec.kind, spec.defaults.iter().copied()))
            .collect();
        Self { collections }
    }

    pub(crate) fn from_collections(collections: Vec<KeywordCollection>) -> Self {
        Self { collections }
    }

    pub fn get(&self, name: &str) -> Option<&KeywordCollection> {
        self.collections.iter().find(|c| c.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut KeywordCollection, ConsoleError> {
        self.collections
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ConsoleError::UnknownCollection(name.to_string()))
    }

    pub fn add(&mut self, name: &str, text: &str) -> Result<&[String], ConsoleError> {
        self.get_mut(name)?.add(text)
    }

    pub fn remove(&mut self, name: &str, text: &str) -> Result<bool, ConsoleError> {
        Ok(self.get_mut(name)?.remove(text))
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordCollection> {
        self.collections.iter()
    }

    pub fn total(&self, kind: CollectionKind) -> usize {
        self.collections
            .iter()
            .filter(|c| c.kind == kind)
            .map(KeywordCollection::len)
            .sum()
    }

    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.collections
            .iter()
            .map(|c| (c.name.clone(), c.items.clone()))
            .collect()
    }
}
