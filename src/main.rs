// src/main.rs

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{stdout, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

mod app;
mod cli;
mod config;
mod core;
mod logging;
mod ui;

use app::{App, AppState};
use cli::Cli;
use config::EngineConfig;
use crate::core::aggregator::{EngagementStatus, FanoutAggregator};
use crate::core::models::AggregateResult;
use crate::core::report::ReportFormat;
use crate::core::sources::HttpSources;
use crate::core::target::Target;

/// What a finished engagement task sends back to the event loop.
type EngagementOutcome = (Target, Option<AggregateResult>, EngagementStatus);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    let log_path = logging::initialize_logging()?;

    let config = EngineConfig::from_env()?;
    info!(api = %config.api_base, timeout = ?config.source_timeout, log = %log_path.display(), "Starting ReconGuard.");
    let sources = HttpSources::new(&config)?;
    let aggregator = FanoutAggregator::new(Arc::new(sources), config.source_timeout);

    if let Some(target) = args.target.as_deref() {
        return run_one_shot(&aggregator, &args, target, &config).await;
    }

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new(config.report_dir.clone());
    let (tx, mut rx) = mpsc::channel::<EngagementOutcome>(1);

    let run_result = run_loop(&mut terminal, &mut app, &aggregator, &tx, &mut rx).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    run_result
}

/// Non-interactive mode: status on stderr, document on stdout.
async fn run_one_shot(aggregator: &FanoutAggregator, args: &Cli, target: &str, config: &EngineConfig) -> Result<()> {
    let format = ReportFormat::from(args.format);
    let outcome = cli::run_once(aggregator, target).await?;
    eprintln!("{}", outcome.status);

    stdout().write_all(&outcome.document.encode(format)?)?;
    if args.export {
        let path = outcome.document.export(&config.report_dir, format)?;
        eprintln!("Report saved: {}", path.display());
    }
    Ok(())
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    aggregator: &FanoutAggregator,
    tx: &mpsc::Sender<EngagementOutcome>,
    rx: &mut mpsc::Receiver<EngagementOutcome>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app, aggregator, tx)?;
        }

        if let Ok((target, result, status)) = rx.try_recv() {
            app.finish_engagement(target, result, status);
        }

        app.on_tick();
    }
    Ok(())
}

fn handle_events(app: &mut App, aggregator: &FanoutAggregator, tx: &mpsc::Sender<EngagementOutcome>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Idle => handle_idle_input(app, key.code, aggregator, tx),
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Scanning => {
                    if key.code == KeyCode::Char('q') { app.quit(); }
                }
            }
        }
    }
    Ok(())
}

/// Handles input while the operator is typing a target.
fn handle_idle_input(
    app: &mut App,
    key_code: KeyCode,
    aggregator: &FanoutAggregator,
    tx: &mpsc::Sender<EngagementOutcome>,
) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => { app.input.pop(); },
        KeyCode::Enter => {
            // Validation happens here, before anything is spawned.
            let Some(target) = app.begin_engagement() else { return };

            let tx_clone = tx.clone();
            let aggregator = aggregator.clone();
            tokio::spawn(async move {
                let (result, status) = aggregator.run(&target).await;
                if tx_clone.send((target, result, status)).await.is_err() {
                    error!("Event loop is gone; dropping engagement outcome.");
                }
            });
        }
        _ => {}
    }
}

/// Handles input while a finished engagement is displayed.
fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('t') => app.terminate(),
        KeyCode::Char('e') => app.export_report(ReportFormat::Markdown),
        KeyCode::Char('j') => app.export_report(ReportFormat::Json),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        _ => {}
    }
}
