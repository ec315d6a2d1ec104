//! Line-oriented operator console for the discovery crawlers.
mod effects;
mod input;
mod render;
mod settings;

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use crawler_core::{update, AppState, Msg, Platform};
use crawler_logging::{crawler_info, crawler_warn};
use log::LevelFilter;

use effects::EffectRunner;
use input::Command;
use settings::Cli;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Core(Msg),
    InputError(String),
    Show,
    Help,
    Quit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    crawler_logging::initialize(cli.log_to.into(), &cli.log_file, LevelFilter::Info);
    crawler_info!("Console starting, api={} data={:?}", cli.api_url, cli.data_dir);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(cli.api_settings(), cli.data_dir.clone(), event_tx.clone())?;

    spawn_poll_ticker(event_tx.clone(), cli.poll_interval());
    spawn_input_reader(event_tx.clone());
    for platform in Platform::ALL {
        let _ = event_tx.send(AppEvent::Core(Msg::PanelActivated(platform)));
    }
    let _ = event_tx.send(AppEvent::Core(Msg::PollTick));
    drop(event_tx);

    println!("crawler console ready, type 'help' for commands");
    let mut state = AppState::with_settings(cli.sync_settings());
    let mut last_status = String::new();

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Core(msg) => {
                let (next, effects) = update(state, msg);
                state = next;
                runner.enqueue(effects);
                if state.consume_dirty() {
                    for notice in state.take_notices() {
                        println!("{}", render::notice_line(&notice));
                    }
                    let status = render::status_line(&state.view());
                    if status != last_status {
                        println!("{status}");
                        last_status = status;
                    }
                }
            }
            AppEvent::InputError(message) => println!("{message}"),
            AppEvent::Show => print!("{}", render::full_view(&state.view())),
            AppEvent::Help => println!("{}", input::HELP),
            AppEvent::Quit => break,
        }
    }

    crawler_info!("Console exiting");
    Ok(())
}

/// Fixed-interval status polling, independent of operator activity.
fn spawn_poll_ticker(event_tx: mpsc::Sender<AppEvent>, interval: Duration) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if event_tx.send(AppEvent::Core(Msg::PollTick)).is_err() {
            break;
        }
    });
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    crawler_warn!("stdin read failed: {}", err);
                    break;
                }
            };
            let events = match input::parse(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Messages(messages))) => {
                    messages.into_iter().map(AppEvent::Core).collect()
                }
                Ok(Some(Command::Show)) => vec![AppEvent::Show],
                Ok(Some(Command::Help)) => vec![AppEvent::Help],
                Ok(Some(Command::Quit)) => vec![AppEvent::Quit],
                Err(message) => vec![AppEvent::InputError(message)],
            };
            for event in events {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
        // End of input ends the session.
        let _ = event_tx.send(AppEvent::Quit);
    });
}
