use crawler_logging::{crawler_debug, crawler_info, crawler_warn};

use crate::{AppState, ConsoleError, Effect, Msg, Notice, PanelConfig, Platform, RunState, Timer};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PanelActivated(platform) => {
            let panel = state.panel_mut(platform);
            let mut effects = Vec::with_capacity(2);
            if !panel.load_requested {
                panel.load_requested = true;
                effects.push(Effect::LoadConfig { platform });
            }
            effects.push(Effect::FetchStatistics { platform });
            effects
        }
        Msg::ConfigLoaded { platform, result } => {
            match result {
                Ok(config) => {
                    crawler_info!("Loaded {} configuration", platform);
                    state.panel_mut(platform).replace_config(config);
                }
                Err(reason) => {
                    let default = PanelConfig::defaults(platform);
                    state.panel_mut(platform).replace_config(default);
                    reject(&mut state, ConsoleError::Persistence(reason));
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::SliderMoved {
            platform,
            key,
            value,
        } => {
            if let Err(err) = ensure_editable(&state, platform) {
                return rejected(state, err);
            }
            let frame_delay = state.settings().frame_delay;
            match state.panel_mut(platform).submit(&key, value) {
                Ok((stream, token, warning)) => {
                    if let Some(warning) = warning {
                        reject(&mut state, warning);
                    }
                    state.mark_dirty();
                    vec![Effect::Schedule {
                        timer: Timer::Frame {
                            platform,
                            stream,
                            token,
                        },
                        delay: frame_delay,
                    }]
                }
                Err(err) => return rejected(state, err),
            }
        }
        Msg::TimerFired(timer) => on_timer(&mut state, timer),
        Msg::LinkedValueSet {
            platform,
            pair,
            member,
            value,
        } => {
            if let Err(err) = ensure_editable(&state, platform) {
                return rejected(state, err);
            }
            match state.panel_mut(platform).set_linked(&pair, &member, value) {
                Ok(_) => state.mark_dirty(),
                Err(err) => reject(&mut state, err),
            }
            Vec::new()
        }
        Msg::KeywordAdded {
            platform,
            collection,
            text,
        } => {
            if let Err(err) = ensure_editable(&state, platform) {
                return rejected(state, err);
            }
            let panel = state.panel_mut(platform);
            match panel.config.keywords.add(&collection, &text).map(|_| ()) {
                Ok(()) => {
                    panel.mark_changed();
                    state.mark_dirty();
                }
                Err(err) => reject(&mut state, err),
            }
            Vec::new()
        }
        Msg::KeywordRemoved {
            platform,
            collection,
            text,
        } => {
            if let Err(err) = ensure_editable(&state, platform) {
                return rejected(state, err);
            }
            let panel = state.panel_mut(platform);
            match panel.config.keywords.remove(&collection, &text) {
                Ok(true) => {
                    panel.mark_changed();
                    state.mark_dirty();
                }
                Ok(false) => {}
                Err(err) => reject(&mut state, err),
            }
            Vec::new()
        }
        Msg::SaveClicked(platform) => {
            if let Err(err) = ensure_editable(&state, platform) {
                return rejected(state, err);
            }
            let panel = state.panel_mut(platform);
            if panel.is_saving() {
                state.push_notice(Notice::info(format!("{platform} save already in progress")));
                return (state, Vec::new());
            }
            let config = panel.begin_save();
            state.mark_dirty();
            vec![Effect::SaveConfig { platform, config }]
        }
        Msg::SaveCompleted { platform, result } => {
            let ok = result.is_ok();
            let saved = state.panel_mut(platform).finish_save(ok);
            let mut effects = Vec::new();
            match result {
                Ok(()) => {
                    crawler_info!("Saved {} configuration", platform);
                    state.push_notice(Notice::info(format!("{platform} configuration saved")));
                    if let (true, Some(config)) = (state.settings().mirror_remote, saved) {
                        effects.push(Effect::MirrorConfig { platform, config });
                    }
                }
                Err(reason) => reject(&mut state, ConsoleError::Persistence(reason)),
            }
            effects
        }
        Msg::MirrorCompleted { platform, result } => {
            if let Err(reason) = result {
                crawler_warn!("Remote config mirror for {} failed: {}", platform, reason);
                state.push_notice(Notice::warning(format!(
                    "{platform} saved locally, remote mirror failed: {reason}"
                )));
            }
            Vec::new()
        }
        Msg::StartClicked(platform) => {
            if !state.panel(platform).is_loaded() {
                return rejected(state, ConsoleError::ConfigNotLoaded(platform));
            }
            if let Err(err) = state.sync_mut().request_start(platform) {
                return rejected(state, err);
            }
            // Dispatch the latest in-memory values, including a slider still settling.
            let panel = state.panel_mut(platform);
            for (key, value) in panel.flush_pending() {
                if let Err(err) = panel.commit(&key, value) {
                    crawler_warn!("Dropped pending {} value before start: {}", key, err);
                }
            }
            let params = panel.config.params.clone();
            crawler_info!("Dispatching start for {}", platform);
            state.mark_dirty();
            vec![Effect::DispatchStart { platform, params }]
        }
        Msg::StartResponded { platform, result } => {
            match result {
                Ok(()) => {
                    if let Some(token) = state.sync_mut().start_accepted() {
                        state.push_notice(Notice::info(format!("{platform} crawler start accepted")));
                        return accepted(state, token);
                    }
                    state.mark_dirty();
                }
                Err(reason) => {
                    state.sync_mut().start_failed();
                    reject(&mut state, ConsoleError::Network(reason));
                }
            }
            Vec::new()
        }
        Msg::StopClicked => {
            if let Err(err) = state.sync_mut().request_stop() {
                return rejected(state, err);
            }
            crawler_info!("Dispatching stop");
            state.mark_dirty();
            vec![Effect::DispatchStop]
        }
        Msg::StopResponded { result } => {
            match result {
                Ok(()) => {
                    if let Some(token) = state.sync_mut().stop_accepted() {
                        state.push_notice(Notice::info("crawler stop accepted"));
                        return accepted(state, token);
                    }
                    state.mark_dirty();
                }
                Err(reason) => {
                    state.sync_mut().stop_failed();
                    reject(&mut state, ConsoleError::Network(reason));
                }
            }
            Vec::new()
        }
        Msg::PollTick | Msg::RefreshClicked => {
            if state.sync_mut().begin_poll() {
                vec![Effect::PollStatus]
            } else {
                crawler_debug!("Status poll still in flight, skipping tick");
                Vec::new()
            }
        }
        Msg::StatusPolled(result) => {
            match result {
                Ok(report) => {
                    let before = state.run_state();
                    if let Some(next) = state.sync_mut().poll_succeeded(report) {
                        if let Some(text) = transition_notice(before, next) {
                            state.push_notice(Notice::info(text));
                        }
                        state.mark_dirty();
                    }
                }
                Err(reason) => state.sync_mut().poll_failed(&reason),
            }
            Vec::new()
        }
        Msg::StatisticsRequested(platform) => vec![Effect::FetchStatistics { platform }],
        Msg::StatisticsFetched { platform, result } => {
            match result {
                Ok(stats) => {
                    state.panel_mut(platform).statistics = Some(stats);
                    state.mark_dirty();
                }
                Err(reason) => crawler_warn!("Statistics for {} unavailable: {}", platform, reason),
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn on_timer(state: &mut AppState, timer: Timer) -> Vec<Effect> {
    match timer {
        Timer::Frame {
            platform,
            stream,
            token,
        } => {
            let delay = state.settings().quiet_period;
            match state.panel_mut(platform).frame_elapsed(&stream, token) {
                Some(token) => vec![Effect::Schedule {
                    timer: Timer::Quiet {
                        platform,
                        stream,
                        token,
                    },
                    delay,
                }],
                None => Vec::new(),
            }
        }
        Timer::Quiet {
            platform,
            stream,
            token,
        } => {
            let Some((key, value)) = state.panel_mut(platform).quiet_elapsed(&stream, token) else {
                return Vec::new();
            };
            if let Err(err) = ensure_unlocked(state) {
                state.panel_mut(platform).reject_commit(&key);
                reject(state, err);
                return Vec::new();
            }
            match state.panel_mut(platform).commit(&key, value) {
                Ok(true) => state.mark_dirty(),
                Ok(false) => {}
                Err(err) => reject(state, err),
            }
            Vec::new()
        }
        Timer::Grace { token } => {
            if let Some(err) = state.sync_mut().grace_elapsed(token) {
                crawler_warn!("{}", err);
                reject(state, err);
            }
            Vec::new()
        }
    }
}

fn ensure_unlocked(state: &AppState) -> Result<(), ConsoleError> {
    if state.sync().is_locked() {
        Err(ConsoleError::ConfigLockedWhileRunning)
    } else {
        Ok(())
    }
}

/// Edits are refused until the stored record has replaced the placeholder defaults.
fn ensure_editable(state: &AppState, platform: Platform) -> Result<(), ConsoleError> {
    ensure_unlocked(state)?;
    if state.panel(platform).is_loaded() {
        Ok(())
    } else {
        Err(ConsoleError::ConfigNotLoaded(platform))
    }
}

fn reject(state: &mut AppState, err: ConsoleError) {
    crawler_debug!("Rejected: {}", err);
    state.push_notice(Notice::from(&err));
}

fn rejected(mut state: AppState, err: ConsoleError) -> (AppState, Vec<Effect>) {
    reject(&mut state, err);
    (state, Vec::new())
}

/// Arm the grace timer and confirm with an immediate poll unless one is outstanding.
fn accepted(mut state: AppState, token: u64) -> (AppState, Vec<Effect>) {
    let mut effects = vec![Effect::Schedule {
        timer: Timer::Grace { token },
        delay: state.settings().grace_period,
    }];
    if state.sync_mut().begin_poll() {
        effects.push(Effect::PollStatus);
    }
    (state, effects)
}

fn transition_notice(before: RunState, after: RunState) -> Option<String> {
    match (before, after) {
        (RunState::Starting, RunState::Running) => Some("crawler is running".to_string()),
        (RunState::Stopping, RunState::Idle) => Some("crawler stopped".to_string()),
        (RunState::Running, RunState::Idle) => Some("crawler finished".to_string()),
        (RunState::Idle, RunState::Running) => Some("a crawler is running on the remote".to_string()),
        _ => None,
    }
}
