use std::fmt;

use crawler_core::{PanelConfig, Platform, PlatformStatistics, StatusReport, Timer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Completion of a command executed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StatusPolled(Result<StatusReport, ApiError>),
    StartResponded {
        platform: Platform,
        result: Result<(), ApiError>,
    },
    StopResponded {
        result: Result<(), ApiError>,
    },
    ConfigLoaded {
        platform: Platform,
        result: Result<PanelConfig, String>,
    },
    ConfigSaved {
        platform: Platform,
        result: Result<(), String>,
    },
    ConfigMirrored {
        platform: Platform,
        result: Result<(), ApiError>,
    },
    StatisticsFetched {
        platform: Platform,
        result: Result<PlatformStatistics, ApiError>,
    },
    TimerFired(Timer),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    /// 2xx response carrying `success: false`.
    Rejected,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Rejected => write!(f, "rejected by server"),
            FailureKind::Decode => write!(f, "unexpected response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Body of `POST crawler/start`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRequest {
    pub platform: String,
    pub task_type: String,
    pub params: serde_json::Value,
}

/// Body of `GET status`.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(alias = "running")]
    crawler_running: bool,
    #[serde(default)]
    timestamp: Option<serde_json::Value>,
}

impl From<StatusResponse> for StatusReport {
    fn from(wire: StatusResponse) -> Self {
        let timestamp = match wire.timestamp {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        };
        StatusReport {
            running: wire.crawler_running,
            timestamp,
        }
    }
}

/// Generic acknowledgement of a POST. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Acknowledgement {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub error: Option<String>,
    pub detail: Option<String>,
}

impl Acknowledgement {
    pub(crate) fn reason(self) -> String {
        self.error
            .or(self.detail)
            .or(self.message)
            .unwrap_or_else(|| "success: false".to_string())
    }
}

/// Body of `GET statistics/{platform}`, covering both platforms' field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatisticsResponse {
    pub total_kols: Option<u64>,
    pub total_developers: Option<u64>,
    pub qualified_kols: Option<u64>,
    pub qualified_developers: Option<u64>,
    pub pending_analysis: Option<u64>,
    pub pending_kols: Option<u64>,
    pub pending_developers: Option<u64>,
    pub pending_expansions: Option<u64>,
}

impl StatisticsResponse {
    pub fn normalize(self) -> PlatformStatistics {
        PlatformStatistics {
            total: self.total_kols.or(self.total_developers).unwrap_or(0),
            qualified: self.qualified_kols.or(self.qualified_developers).unwrap_or(0),
            pending_analysis: self
                .pending_analysis
                .or(self.pending_kols)
                .or(self.pending_developers)
                .unwrap_or(0),
            pending_expansions: self.pending_expansions.unwrap_or(0),
        }
    }
}
