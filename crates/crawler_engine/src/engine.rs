use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crawler_core::{PanelConfig, ParameterSet, Platform, Timer};
use crawler_logging::{crawler_debug, crawler_info, crawler_warn};
use thiserror::Error;

use crate::{build_start_request, ConfigStore, CrawlerApi, EngineEvent, PersistError};

/// Receiver of engine completions.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine startup failed: {0}")]
    Startup(#[from] io::Error),
}

enum EngineCommand {
    PollStatus,
    Start { platform: Platform, params: ParameterSet },
    Stop,
    Load { platform: Platform },
    Save { platform: Platform, config: PanelConfig },
    Mirror { platform: Platform, config: PanelConfig },
    Statistics { platform: Platform },
    Schedule { timer: Timer, delay: Duration },
}

/// Runs network, storage and timer work on a background Tokio runtime.
///
/// Every command completes with exactly one [`EngineEvent`] sent to the sink.
/// Dropping the last handle stops the runtime and cancels pending timers.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        api: Arc<dyn CrawlerApi>,
        store: ConfigStore,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("crawler-engine-worker")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();

        thread::Builder::new()
            .name("crawler-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let api = api.clone();
                    let store = store.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        let event = handle_command(api.as_ref(), store, command).await;
                        sink.emit(event);
                    });
                }
                crawler_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    /// Engine whose events arrive on a plain channel.
    pub fn with_channel(
        api: Arc<dyn CrawlerApi>,
        store: ConfigStore,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let handle = Self::new(api, store, Arc::new(ChannelSink::new(event_tx)))?;
        Ok((handle, event_rx))
    }

    pub fn poll_status(&self) {
        self.send(EngineCommand::PollStatus);
    }

    pub fn start(&self, platform: Platform, params: ParameterSet) {
        self.send(EngineCommand::Start { platform, params });
    }

    pub fn stop(&self) {
        self.send(EngineCommand::Stop);
    }

    pub fn load(&self, platform: Platform) {
        self.send(EngineCommand::Load { platform });
    }

    pub fn save(&self, platform: Platform, config: PanelConfig) {
        self.send(EngineCommand::Save { platform, config });
    }

    pub fn mirror(&self, platform: Platform, config: PanelConfig) {
        self.send(EngineCommand::Mirror { platform, config });
    }

    pub fn fetch_statistics(&self, platform: Platform) {
        self.send(EngineCommand::Statistics { platform });
    }

    /// Emit `EngineEvent::TimerFired(timer)` after `delay`.
    pub fn schedule(&self, timer: Timer, delay: Duration) {
        self.send(EngineCommand::Schedule { timer, delay });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            crawler_warn!("Engine thread is gone, command dropped");
        }
    }
}

async fn handle_command(
    api: &dyn CrawlerApi,
    store: ConfigStore,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::PollStatus => EngineEvent::StatusPolled(api.get_status().await),
        EngineCommand::Start { platform, params } => {
            let request = build_start_request(platform, &params);
            crawler_info!("Requesting {} crawler start", platform);
            let result = api.start_crawler(&request).await;
            if let Err(err) = &result {
                crawler_warn!("Start of {} crawler failed: {}", platform, err);
            }
            EngineEvent::StartResponded { platform, result }
        }
        EngineCommand::Stop => {
            crawler_info!("Requesting crawler stop");
            let result = api.stop_crawler().await;
            if let Err(err) = &result {
                crawler_warn!("Stop request failed: {}", err);
            }
            EngineEvent::StopResponded { result }
        }
        EngineCommand::Load { platform } => {
            let result = blocking(move || store.load(platform)).await;
            EngineEvent::ConfigLoaded { platform, result }
        }
        EngineCommand::Save { platform, config } => {
            let result = blocking(move || store.save(platform, &config)).await;
            EngineEvent::ConfigSaved { platform, result }
        }
        EngineCommand::Mirror { platform, config } => {
            let result = api.update_config(platform, &config.to_record()).await;
            EngineEvent::ConfigMirrored { platform, result }
        }
        EngineCommand::Statistics { platform } => EngineEvent::StatisticsFetched {
            platform,
            result: api.get_statistics(platform).await,
        },
        EngineCommand::Schedule { timer, delay } => {
            tokio::time::sleep(delay).await;
            EngineEvent::TimerFired(timer)
        }
    }
}

/// Run store IO off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PersistError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(|err| err.to_string()),
        Err(err) => Err(format!("storage task failed: {err}")),
    }
}
