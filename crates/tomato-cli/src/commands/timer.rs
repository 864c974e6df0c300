//! Foreground timer.
//!
//! `timer run` owns one session for the lifetime of the process. Nothing
//! about the in-flight countdown is persisted; only accrued task minutes are
//! written back to the store.

use std::io::Write;

use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tomato_core::audio::{CuePlayer, SilentPlayer, SystemPlayer};
use tomato_core::storage::{self, KeyValueStore, SqliteStore};
use tomato_core::timer::{format_clock, Effect, IntervalTicker, PhaseEngine, Session};
use tomato_core::{AppConfig, Event};

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground, reading commands from stdin
    Run {
        /// Task ID that receives the minutes of each completed work phase
        #[arg(long)]
        task: Option<String>,
        /// Start the first work phase immediately
        #[arg(long)]
        start: bool,
    },
    /// Print the initial timer state for the saved settings as JSON
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Start,
    Pause,
    Toggle,
    Reset,
    Reload,
    Status,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "t" | "toggle" => Input::Toggle,
        "s" | "start" => Input::Start,
        "p" | "pause" => Input::Pause,
        "r" | "reset" => Input::Reset,
        "reload" => Input::Reload,
        "status" => Input::Status,
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

const HELP: &str = "commands: <enter>/toggle, start, pause, reset, reload, status, help, quit";

pub fn run(action: TimerAction, config: &AppConfig) -> CmdResult {
    let mut store = SqliteStore::open()?;
    let settings = storage::load_settings(&store);

    match action {
        TimerAction::Status => {
            let engine = PhaseEngine::new(settings.phase_config(), settings.cue());
            print_json(&engine.snapshot())?;
        }
        TimerAction::Run { task, start } => {
            if let Some(id) = &task {
                if storage::load_tasks(&store).get(id).is_none() {
                    return Err(format!("unknown task: {id}").into());
                }
            }
            let engine = PhaseEngine::new(settings.phase_config(), settings.cue());
            let mut session = Session::new(engine, IntervalTicker::new(), build_player(config)?)
                .on_complete(|completion| {
                    println!(
                        "\n{} complete ({} pomodoros). Next: {}. Press enter to start.",
                        completion.completed, completion.completed_work_count, completion.next
                    );
                });
            session.associate_task(task);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_loop(&mut session, &mut store, start))?;
        }
    }
    Ok(())
}

fn build_player(config: &AppConfig) -> Result<Box<dyn CuePlayer>, Box<dyn std::error::Error>> {
    if !config.audio.enabled {
        return Ok(Box::new(SilentPlayer));
    }
    Ok(Box::new(SystemPlayer::new(config.sounds_dir()?)))
}

async fn run_loop(
    session: &mut Session<IntervalTicker>,
    store: &mut SqliteStore,
    start: bool,
) -> CmdResult {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprintln!("{HELP}");
    if start {
        report(session.start());
    }
    render(session.engine());

    loop {
        tokio::select! {
            Some(tick) = session.next_tick() => {
                let effects = session.handle_tick(tick);
                apply_accruals(store, &effects);
                render(session.engine());
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Start => report(session.start()),
                    Input::Pause => report(session.pause()),
                    Input::Toggle => report(session.toggle()),
                    Input::Reset => report(session.reset()),
                    Input::Reload => {
                        let settings = storage::load_settings(&*store);
                        report(session.reconfigure(settings.phase_config(), settings.cue()));
                    }
                    Input::Status => print_json(&session.engine().snapshot())?,
                    Input::Help => eprintln!("{HELP}"),
                    Input::Quit => break,
                    Input::Unknown(other) => eprintln!("unknown command: {other} ({HELP})"),
                }
                render(session.engine());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    println!();
    Ok(())
}

fn apply_accruals(store: &mut dyn KeyValueStore, effects: &[Effect]) {
    for effect in effects {
        let Effect::AccrueDuration(accrual) = effect else {
            continue;
        };
        let mut tasks = storage::load_tasks(&*store);
        if !tasks.accrue(&accrual.task_id, accrual.minutes) {
            tracing::warn!(task_id = %accrual.task_id, "task vanished before accrual");
            continue;
        }
        if let Err(e) = storage::save_tasks(store, &tasks) {
            tracing::warn!(error = %e, task_id = %accrual.task_id, "failed to save accrual");
        }
    }
}

fn report(event: Option<Event>) {
    if let Some(event) = event {
        tracing::debug!(?event, "timer command");
    }
}

fn render(engine: &PhaseEngine) {
    let state = if engine.is_running() { "running" } else { "paused" };
    print!(
        "\r{:<11} {}  [{}]  pomodoros: {}   ",
        engine.phase().label(),
        format_clock(engine.remaining_secs()),
        state,
        engine.completed_work_count()
    );
    let _ = std::io::stdout().flush();
}
