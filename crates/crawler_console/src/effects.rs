use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::Context;
use crawler_core::{Effect, Msg};
use crawler_engine::{
    ensure_data_dir, ApiSettings, ConfigStore, EngineEvent, EngineHandle, EventSink, FileStore,
    ReqwestApi,
};
use crawler_logging::{crawler_debug, crawler_info};

use crate::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        api: ApiSettings,
        data_dir: PathBuf,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> anyhow::Result<Self> {
        ensure_data_dir(&data_dir)
            .with_context(|| format!("cannot use data directory {}", data_dir.display()))?;
        crawler_info!("Configuration records in {:?}", data_dir);

        let api = ReqwestApi::new(api).context("invalid API settings")?;
        let store = ConfigStore::new(Arc::new(FileStore::new(data_dir)));
        let sink = Arc::new(MsgSink { tx: event_tx });
        let engine = EngineHandle::new(Arc::new(api), store, sink)?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadConfig { platform } => self.engine.load(platform),
                Effect::SaveConfig { platform, config } => self.engine.save(platform, config),
                Effect::MirrorConfig { platform, config } => self.engine.mirror(platform, config),
                Effect::DispatchStart { platform, params } => {
                    crawler_info!("DispatchStart platform={} params={}", platform, params.len());
                    self.engine.start(platform, params);
                }
                Effect::DispatchStop => self.engine.stop(),
                Effect::PollStatus => self.engine.poll_status(),
                Effect::FetchStatistics { platform } => self.engine.fetch_statistics(platform),
                Effect::Schedule { timer, delay } => {
                    crawler_debug!("Schedule {:?} in {:?}", timer, delay);
                    self.engine.schedule(timer, delay);
                }
            }
        }
    }
}

/// Feeds engine completions back into the console loop as messages.
struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Core(to_msg(event)));
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatusPolled(result) => Msg::StatusPolled(result.map_err(|err| err.to_string())),
        EngineEvent::StartResponded { platform, result } => Msg::StartResponded {
            platform,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::StopResponded { result } => Msg::StopResponded {
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ConfigLoaded { platform, result } => Msg::ConfigLoaded { platform, result },
        EngineEvent::ConfigSaved { platform, result } => Msg::SaveCompleted { platform, result },
        EngineEvent::ConfigMirrored { platform, result } => Msg::MirrorCompleted {
            platform,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::StatisticsFetched { platform, result } => Msg::StatisticsFetched {
            platform,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::TimerFired(timer) => Msg::TimerFired(timer),
    }
}
