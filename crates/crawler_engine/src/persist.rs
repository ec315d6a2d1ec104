//! Durable storage primitives for per-platform configuration records.
//!
//! A record is only ever replaced whole: the new text is staged next to the
//! old file and renamed over it, so a crash leaves either the previous
//! record or the new one on disk, never a truncated mix.
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Why a configuration record could not be stored or read back.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The record directory is missing, not a directory, or cannot be created.
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// The in-memory config could not be turned into record text.
    #[error("could not encode record: {0}")]
    Encode(String),
    /// A stored record exists but does not parse.
    #[error("stored record '{key}' is unreadable: {message}")]
    Decode { key: String, message: String },
}

/// Make sure `dir` can hold configuration records, creating it on first use.
pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::DataDir(format!("{} is not a directory", dir.display()))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))
        }
        Err(err) => Err(PersistError::DataDir(err.to_string())),
    }
}

/// Replaces record files in one directory without ever exposing a partial write.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `content` as `{dir}/{filename}` and return the record path.
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_data_dir(&self.dir)?;

        let target = self.dir.join(filename);
        // Staging file must share the target's filesystem for rename to be atomic.
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content.as_bytes())?;
        staged.flush()?;
        staged.as_file_mut().sync_all()?;

        staged.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
