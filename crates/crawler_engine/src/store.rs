use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crawler_core::{PanelConfig, PersistedConfigRecord, Platform};
use crawler_logging::{crawler_info, crawler_warn};

use crate::{AtomicFileWriter, PersistError};

/// Durable string storage addressed by key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Replace the value of `key`. Must not leave a partial value behind.
    fn put(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// One `<key>.ron` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    writer: AtomicFileWriter,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir().join(file_name(key))
    }
}

fn file_name(key: &str) -> String {
    format!("{key}.ron")
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.writer.write(&file_name(key), value).map(|_| ())
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `put` fail without touching stored values.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistError::Io(io::Error::other("store is read-only")));
        }
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Platform configuration records on top of a [`KeyValueStore`], encoded as RON.
#[derive(Clone)]
pub struct ConfigStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ConfigStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Stored record merged over the defaults, or the defaults if nothing is stored.
    pub fn load(&self, platform: Platform) -> Result<PanelConfig, PersistError> {
        let key = platform.config_key();
        let Some(text) = self.backend.get(&key)? else {
            crawler_info!("No stored {} record, using defaults", platform);
            return Ok(PanelConfig::defaults(platform));
        };
        let record: PersistedConfigRecord = ron::from_str(&text).map_err(|err| {
            crawler_warn!("Stored {} record is unreadable: {}", platform, err);
            PersistError::Decode {
                key: key.clone(),
                message: err.to_string(),
            }
        })?;
        crawler_info!("Loaded {} record (version {})", platform, record.version);
        Ok(PanelConfig::merge(platform, record))
    }

    pub fn save(&self, platform: Platform, config: &PanelConfig) -> Result<(), PersistError> {
        let pretty = ron::ser::PrettyConfig::new();
        let text = ron::ser::to_string_pretty(&config.to_record(), pretty)
            .map_err(|err| PersistError::Encode(err.to_string()))?;
        self.backend.put(&platform.config_key(), &text)?;
        crawler_info!("Stored {} record", platform);
        Ok(())
    }
}
