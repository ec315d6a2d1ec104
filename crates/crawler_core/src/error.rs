use thiserror::Error;

use crate::Platform;

/// Every recoverable failure the console engine can report.
///
/// None of these is fatal; each one ends up as a [`Notice`] for the operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsoleError {
    #[error("keyword is empty")]
    EmptyInput,
    #[error("'{text}' already exists in {collection}")]
    DuplicateEntry { collection: String, text: String },
    #[error("unknown keyword collection '{0}'")]
    UnknownCollection(String),
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("unknown linked pair or member '{0}'")]
    UnknownLinkedPair(String),
    #[error("{key} = {raw} is out of range, clamped to {clamped}")]
    ValueClamped { key: String, raw: f64, clamped: f64 },
    #[error("configuration is locked while a crawler is active")]
    ConfigLockedWhileRunning,
    #[error("{0} configuration is still loading")]
    ConfigNotLoaded(Platform),
    #[error("a crawler is already running")]
    AlreadyRunning,
    #[error("a start or stop command is already in progress")]
    AlreadyTransitioning,
    #[error("no crawler is running")]
    NotRunning,
    #[error("storage failure: {0}")]
    Persistence(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("crawler did not report running before the grace period elapsed")]
    StartTimedOut,
    #[error("crawler did not report stopped before the grace period elapsed")]
    StopTimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, operator-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

impl From<&ConsoleError> for Notice {
    fn from(err: &ConsoleError) -> Self {
        let level = match err {
            ConsoleError::Persistence(_)
            | ConsoleError::Network(_)
            | ConsoleError::StartTimedOut
            | ConsoleError::StopTimedOut => NoticeLevel::Error,
            _ => NoticeLevel::Warning,
        };
        Self {
            level,
            text: err.to_string(),
        }
    }
}
