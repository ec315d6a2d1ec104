//! Crawler engine: HTTP client, persistence and effect execution.
mod client;
mod dispatch;
mod engine;
mod persist;
mod store;
mod types;

pub use client::{ApiSettings, CrawlerApi, ReqwestApi};
pub use dispatch::{build_start_request, TASK_TYPE};
pub use engine::{ChannelSink, EngineError, EngineHandle, EventSink};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use store::{ConfigStore, FileStore, KeyValueStore, MemoryStore};
pub use types::{ApiError, EngineEvent, FailureKind, StartRequest, StatisticsResponse};
