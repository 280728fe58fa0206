use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use ycsa_core::{update, AppState, LabelMap, Msg};
use ycsa_engine::{load_classifier, EngineConfig, EngineHandle, JsonClient, YouTubeApi};
use ycsa_logging::{redact_api_key, ycsa_info};

use super::config::{AppConfig, API_KEY_ENV, DEFAULT_CONFIG_FILE};
use super::effects::EffectRunner;
use super::logging;
use super::ui::commands::{parse_command, Command};
use super::ui::{constants, render};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Everything the main loop reacts to.
pub enum AppEvent {
    Msg(Msg),
    Command(Command),
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = AppConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {config_path:?}"))?;
    config.apply_env_key(std::env::var(API_KEY_ENV).ok());
    logging::initialize(config.log_destination);
    ycsa_info!(
        "Starting ycsa with config {:?}, api base {}",
        config_path,
        redact_api_key(&config.api_base)
    );

    let api_key = config.require_api_key()?.to_string();
    let classifier = load_classifier(
        &config.vectorizer_path,
        &config.classifier_path,
        LabelMap::standard(),
    )
    .with_context(|| {
        format!(
            "loading sentiment model from {:?} and {:?}",
            config.vectorizer_path, config.classifier_path
        )
    })?;

    let http = JsonClient::new(config.http_settings()).context("building HTTP client")?;
    let api = Arc::new(
        YouTubeApi::new(http, &config.api_base, api_key)
            .context("invalid api_base")?
            .with_page_size(config.comment_page_size),
    );
    let engine = EngineHandle::new(EngineConfig {
        comment_source: api.clone(),
        chat_source: api,
        classifier: Arc::new(classifier),
        monitor: config.monitor_settings(),
        max_comment_pages: config.max_comment_pages,
        output_dir: config.output_dir.clone(),
        generated_utc: Arc::new(|| Utc::now().to_rfc3339()),
    })
    .context("starting engine runtime")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(engine, event_tx.clone());
    spawn_input_reader(event_tx.clone());
    spawn_ticker(event_tx);

    let mut state = AppState::new();
    print_screen(&render::render(&state.view()));
    println!("{}", constants::HELP_TEXT);
    print_prompt();

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(Msg::Tick) => {
                if state.consume_dirty() {
                    print_screen(&render::render(&state.view()));
                    print_prompt();
                }
            }
            AppEvent::Msg(msg) => state = dispatch(state, msg, &runner),
            AppEvent::Command(Command::Dispatch(msgs)) => {
                for msg in msgs {
                    state = dispatch(state, msg, &runner);
                }
            }
            AppEvent::Command(Command::Help) => {
                println!("{}", constants::HELP_TEXT);
                print_prompt();
            }
            AppEvent::Command(Command::Unknown(line)) => {
                println!("Unknown command: {line} (type 'help')");
                print_prompt();
            }
            AppEvent::Command(Command::Empty) => print_prompt(),
            AppEvent::Command(Command::Quit) => break,
        }
    }

    // Also cancels a live-chat lookup still in flight; no-op when idle.
    let _ = dispatch(state, Msg::PauseMonitoringClicked, &runner);
    ycsa_info!("ycsa exiting");
    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if event_tx
                .send(AppEvent::Command(parse_command(&line)))
                .is_err()
            {
                return;
            }
        }
        // EOF behaves like `quit`.
        let _ = event_tx.send(AppEvent::Command(Command::Quit));
    });
}

// Coalesces rendering.
fn spawn_ticker(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while event_tx.send(AppEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

fn print_screen(text: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout);
    let _ = write!(stdout, "{text}");
}

fn print_prompt() {
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "{}", constants::PROMPT);
    let _ = stdout.flush();
}
