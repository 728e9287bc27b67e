// ============================================================================
// commodity-dash - Entry point
// ============================================================================
// TUI dashboard over a commodity catalog with a shared overlay chart.
//
// Runtime shape: the event loop is synchronous; price-series fetches run on
// a background worker thread with its own tokio runtime. The loop sends
// AppCommand values to the worker and drains AppResult values back, so each
// fetch completion is applied to the dashboard state as one atomic step.
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use commodity_dash::api::provider::RawSeriesPayload;
use commodity_dash::api::{catalog, provider};
use commodity_dash::app::{App, FetchIntent, FetchRequest, Panel};
use commodity_dash::models::WidgetAction;
use commodity_dash::ui::{render, Event, EventHandler};

// ============================================================================
// Worker commands and results
// ============================================================================

/// Commands sent to the background fetch worker.
#[derive(Debug, Clone)]
enum AppCommand {
    /// Fetch the raw price series for one commodity.
    FetchSeries(FetchRequest),
}

/// Results sent back by the worker. The raw payload crosses the channel;
/// normalization happens inside the event loop step that applies it.
#[derive(Debug)]
enum AppResult {
    SeriesFetched {
        intent: FetchIntent,
        commodity_id: u32,
        label: String,
        outcome: std::result::Result<RawSeriesPayload, String>,
    },
}

// ============================================================================
// Logging
// ============================================================================

/// Initializes file logging. The TUI owns the terminal, so logs go to a
/// daily-rolling file under the platform data directory
/// (ex: ~/.local/share/commodity-dash/logs/ on Linux).
///
/// Level is controlled through RUST_LOG
/// (ex: RUST_LOG=commodity_dash=trace cargo run).
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("commodity-dash")
        .join("logs");
    std::fs::create_dir_all(&log_dir).context("failed to create the log directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "commodity-dash.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commodity_dash=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialized");
    Ok(())
}

// ============================================================================
// Entry point
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("Warning: failed to initialize logging: {e}");
    });

    info!("commodity-dash starting up");

    // One catalog read at startup. Failure is non-fatal: the dashboard runs
    // with an empty selection panel and the error on the status line.
    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = App::new();
    match runtime.block_on(catalog::fetch_catalog(&catalog::catalog_url())) {
        Ok(records) => app.catalog_loaded(records),
        Err(e) => {
            error!(error = %e, "Catalog load failed");
            app.status = Some(e.to_string());
        }
    }
    drop(runtime);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(app));
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background fetch worker");
    spawn_fetch_worker(command_rx, result_tx, app.clone());

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background fetch worker
// ============================================================================

/// Worker thread driving the async provider client. One fetch at a time;
/// each result is pushed back to the event loop over `result_tx`.
fn spawn_fetch_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = %e, "Failed to create worker runtime");
                return;
            }
        };
        let api_key = provider::api_key();

        while let Ok(command) = command_rx.recv() {
            debug!(?command, "Worker received command");

            match command {
                AppCommand::FetchSeries(request) => {
                    {
                        let mut app_lock = app.lock().unwrap();
                        app_lock.start_loading(Some(format!("Fetching {}...", request.label)));
                    }

                    let outcome = runtime
                        .block_on(provider::fetch_series(&request.provider_key, &api_key))
                        .map_err(|e| e.to_string());

                    match &outcome {
                        Ok(_) => info!(commodity_id = request.commodity_id, "Series fetched"),
                        Err(e) => {
                            error!(commodity_id = request.commodity_id, error = %e, "Series fetch failed")
                        }
                    }

                    let _ = result_tx.send(AppResult::SeriesFetched {
                        intent: request.intent,
                        commodity_id: request.commodity_id,
                        label: request.label,
                        outcome,
                    });

                    {
                        let mut app_lock = app.lock().unwrap();
                        app_lock.stop_loading();
                    }
                }
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event loop
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // Completed fetches first, one per iteration, applied atomically.
        if let Ok(AppResult::SeriesFetched {
            intent,
            commodity_id,
            label,
            outcome,
        }) = result_rx.try_recv()
        {
            let mut app_lock = app.lock().unwrap();
            app_lock.series_fetched(intent, commodity_id, &label, outcome);
        }

        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        if let Ok(event) = events.next() {
            let mut app_lock = app.lock().unwrap();
            handle_event(&mut app_lock, event, &command_tx);
        }
    }

    Ok(())
}

/// Routes one input event into the controller.
fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<AppCommand>) {
    use commodity_dash::ui::events::{
        is_compare_event, is_down_event, is_enter_event, is_quit_event, is_remove_event,
        is_show_graph_event, is_tab_event, is_up_event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.confirm_quit {
                info!("User confirmed quit");
                app.quit();
            } else {
                app.request_quit();
            }
        }

        Event::Key(_) if is_tab_event(&event) => {
            app.cancel_quit();
            app.toggle_focus();
        }

        Event::Key(_) if is_up_event(&event) => {
            app.cancel_quit();
            app.navigate_up();
        }

        Event::Key(_) if is_down_event(&event) => {
            app.cancel_quit();
            app.navigate_down();
        }

        // Enter on the catalog panel opens a widget for the highlighted
        // commodity (idempotent when it is already open).
        Event::Key(_) if is_enter_event(&event) && app.focus == Panel::Catalog => {
            app.cancel_quit();
            if let Some(id) = app.selected_catalog_record().map(|r| r.id) {
                app.selection_made(id);
            }
        }

        Event::Key(_) if is_show_graph_event(&event) && app.focus == Panel::Widgets => {
            dispatch_widget_action(app, WidgetAction::ShowGraph, command_tx);
        }

        Event::Key(_) if is_compare_event(&event) && app.focus == Panel::Widgets => {
            dispatch_widget_action(app, WidgetAction::Compare, command_tx);
        }

        Event::Key(_) if is_remove_event(&event) && app.focus == Panel::Widgets => {
            dispatch_widget_action(app, WidgetAction::Remove, command_tx);
        }

        Event::Key(_) => {
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

/// Runs a widget affordance on the focused card, dispatching the fetch to
/// the worker when the controller asks for one.
fn dispatch_widget_action(
    app: &mut App,
    action: WidgetAction,
    command_tx: &mpsc::Sender<AppCommand>,
) {
    app.cancel_quit();
    let id = match app.focused_widget_id() {
        Some(id) => id,
        None => return,
    };
    if let Some(request) = app.widget_action(id, action) {
        let _ = command_tx.send(AppCommand::FetchSeries(request));
    }
}

// ============================================================================
// Terminal setup / restore
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
