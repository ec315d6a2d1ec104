use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use crawler_core::{
    PanelConfig, ParameterSet, PersistedConfigRecord, Platform, PlatformStatistics, StatusReport,
    Timer,
};
use crawler_engine::{
    ApiError, ConfigStore, CrawlerApi, EngineEvent, EngineHandle, MemoryStore, StartRequest,
};

#[derive(Default)]
struct FakeApi {
    running: AtomicBool,
    starts: Mutex<Vec<StartRequest>>,
    mirrored: Mutex<Vec<(Platform, PersistedConfigRecord)>>,
}

#[async_trait::async_trait]
impl CrawlerApi for FakeApi {
    async fn get_status(&self) -> Result<StatusReport, ApiError> {
        Ok(StatusReport {
            running: self.running.load(Ordering::SeqCst),
            timestamp: None,
        })
    }

    async fn start_crawler(&self, request: &StartRequest) -> Result<(), ApiError> {
        self.starts.lock().unwrap().push(request.clone());
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_crawler(&self) -> Result<(), ApiError> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn update_config(
        &self,
        platform: Platform,
        record: &PersistedConfigRecord,
    ) -> Result<(), ApiError> {
        self.mirrored.lock().unwrap().push((platform, record.clone()));
        Ok(())
    }

    async fn get_statistics(&self, _platform: Platform) -> Result<PlatformStatistics, ApiError> {
        Ok(PlatformStatistics {
            total: 3,
            ..PlatformStatistics::default()
        })
    }
}

fn spawn_engine(api: Arc<FakeApi>) -> (EngineHandle, mpsc::Receiver<EngineEvent>, Arc<MemoryStore>) {
    crawler_logging::initialize_for_tests();
    let memory = Arc::new(MemoryStore::new());
    let store = ConfigStore::new(memory.clone());
    let (handle, events) = EngineHandle::with_channel(api, store).expect("engine starts");
    (handle, events, memory)
}

fn next(events: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    events
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn start_then_poll_sees_running_crawler() {
    let api = Arc::new(FakeApi::default());
    let (engine, events, _) = spawn_engine(api.clone());

    engine.start(Platform::YouTube, ParameterSet::defaults(Platform::YouTube));
    assert_eq!(
        next(&events),
        EngineEvent::StartResponded {
            platform: Platform::YouTube,
            result: Ok(()),
        }
    );
    let starts = api.starts.lock().unwrap().clone();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].platform, "youtube");

    engine.poll_status();
    assert_eq!(
        next(&events),
        EngineEvent::StatusPolled(Ok(StatusReport {
            running: true,
            timestamp: None,
        }))
    );

    engine.stop();
    assert_eq!(next(&events), EngineEvent::StopResponded { result: Ok(()) });
}

#[test]
fn save_then_load_returns_saved_config() {
    let (engine, events, _) = spawn_engine(Arc::new(FakeApi::default()));
    let mut config = PanelConfig::defaults(Platform::GitHub);
    config.params.set("min_followers", 250.0).unwrap();

    engine.save(Platform::GitHub, config.clone());
    assert_eq!(
        next(&events),
        EngineEvent::ConfigSaved {
            platform: Platform::GitHub,
            result: Ok(()),
        }
    );

    engine.load(Platform::GitHub);
    assert_eq!(
        next(&events),
        EngineEvent::ConfigLoaded {
            platform: Platform::GitHub,
            result: Ok(config),
        }
    );
}

#[test]
fn failed_save_is_reported_as_message() {
    let (engine, events, memory) = spawn_engine(Arc::new(FakeApi::default()));
    memory.set_fail_writes(true);

    engine.save(Platform::YouTube, PanelConfig::defaults(Platform::YouTube));
    match next(&events) {
        EngineEvent::ConfigSaved {
            platform: Platform::YouTube,
            result: Err(message),
        } => assert!(message.contains("read-only")),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn mirror_pushes_record() {
    let api = Arc::new(FakeApi::default());
    let (engine, events, _) = spawn_engine(api.clone());
    let config = PanelConfig::defaults(Platform::YouTube);

    engine.mirror(Platform::YouTube, config.clone());
    assert_eq!(
        next(&events),
        EngineEvent::ConfigMirrored {
            platform: Platform::YouTube,
            result: Ok(()),
        }
    );
    let mirrored = api.mirrored.lock().unwrap();
    assert_eq!(mirrored.as_slice(), &[(Platform::YouTube, config.to_record())]);
}

#[test]
fn scheduled_timer_fires_after_delay() {
    let (engine, events, _) = spawn_engine(Arc::new(FakeApi::default()));
    let timer = Timer::Grace { token: 4 };
    let started = Instant::now();

    engine.schedule(timer.clone(), Duration::from_millis(40));
    assert_eq!(next(&events), EngineEvent::TimerFired(timer));
    assert!(started.elapsed() >= Duration::from_millis(40));
}

#[test]
fn statistics_are_forwarded() {
    let (engine, events, _) = spawn_engine(Arc::new(FakeApi::default()));
    engine.fetch_statistics(Platform::GitHub);
    assert_eq!(
        next(&events),
        EngineEvent::StatisticsFetched {
            platform: Platform::GitHub,
            result: Ok(PlatformStatistics {
                total: 3,
                ..PlatformStatistics::default()
            }),
        }
    );
}
