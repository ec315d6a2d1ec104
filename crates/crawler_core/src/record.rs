use std::collections::BTreeMap;

use crawler_logging::crawler_warn;
use serde::{Deserialize, Serialize};

use crate::keywords::{collection_specs, CollectionKind, KeywordCollection, KeywordSets};
use crate::params::ParameterSet;
use crate::Platform;

/// Schema version written by this build.
pub const RECORD_VERSION: u32 = 1;

/// On-disk form of one platform's configuration.
///
/// Every field defaults so that records written by older builds (including
/// the untagged version 0 layout) still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PersistedConfigRecord {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    #[serde(default)]
    pub keywords: BTreeMap<String, Vec<String>>,
}

/// Parameters plus keyword collections of one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub params: ParameterSet,
    pub keywords: KeywordSets,
}

impl PanelConfig {
    pub fn defaults(platform: Platform) -> Self {
        Self {
            params: ParameterSet::defaults(platform),
            keywords: KeywordSets::defaults(platform),
        }
    }

    pub fn platform(&self) -> Platform {
        self.params.platform()
    }

    pub fn to_record(&self) -> PersistedConfigRecord {
        PersistedConfigRecord {
            version: RECORD_VERSION,
            params: self.params.values().clone(),
            keywords: self.keywords.to_map(),
        }
    }

    /// Default merge: union of default and persisted keys, persisted values win.
    ///
    /// Catalog values are clamped into range and broken linked pairs are
    /// repaired. Unknown parameters and collections are carried through.
    pub fn merge(platform: Platform, record: PersistedConfigRecord) -> Self {
        if record.version > RECORD_VERSION {
            crawler_warn!(
                "{} record has version {} (known {}), merging anyway",
                platform,
                record.version,
                RECORD_VERSION
            );
        }

        let mut params = ParameterSet::defaults(platform);
        for (key, value) in record.params {
            match params.spec(&key) {
                Some(spec) => {
                    let clamped = spec.clamp(value);
                    if clamped != value {
                        crawler_warn!("{} {}={} normalized to {}", platform, key, value, clamped);
                    }
                    params.insert_raw(key, clamped);
                }
                None => params.insert_raw(key, value),
            }
        }
        params.repair_links();

        let mut persisted = record.keywords;
        let mut collections: Vec<KeywordCollection> = collection_specs(platform)
            .iter()
            .map(|spec| match persisted.remove(spec.name) {
                Some(items) => KeywordCollection::from_items(spec.name, spec.kind, items),
                None => KeywordCollection::from_items(spec.name, spec.kind, spec.defaults.iter().copied()),
            })
            .collect();
        // Collections this build does not know yet are kept, but counted in no total.
        collections.extend(
            persisted
                .into_iter()
                .map(|(name, items)| KeywordCollection::from_items(name, CollectionKind::Unclassified, items)),
        );

        Self {
            params,
            keywords: KeywordSets::from_collections(collections),
        }
    }
}
