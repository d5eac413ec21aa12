/// Surge Scanner TUI
///
/// Loads a market-data snapshot (plus an auxiliary implied-volatility
/// history), derives the indicator fields client-side via `surge-core`,
/// and renders a filterable, sortable per-symbol table with expandable
/// detail panels.
///
/// ENV (optional)
/// --------------
/// SNAPSHOT_URL=docs/data/snapshot.json      http(s) URL or file path
/// IV_HISTORY_URL=docs/data/iv_history.json  http(s) URL or file path
/// WATCHLIST_PATH=surge_watchlist.json
/// REFRESH_SECS=0                            auto-refresh interval, 0 = manual
/// RUST_LOG=info                             log filter (to surge-tui.log)
mod app;
mod format;
mod loader;
mod ui;
mod watchlist;

use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, fs::File, io, sync::Arc, time::Duration};
use tracing::{error, info};
use watchlist::FileWatchlist;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Log to file so the alternate screen stays clean.
    let log_file = File::create("surge-tui.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .init();

    let mut app = App::new(FileWatchlist::load(watchlist::watchlist_path()));
    load_into(&mut app).await;

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let poll_timeout = Duration::from_millis(250);
    let refresh_secs = loader::refresh_secs();
    let mut last_load = std::time::Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if refresh_secs > 0 && last_load.elapsed() >= Duration::from_secs(refresh_secs) {
            app.reload_requested = true;
        }

        if app.reload_requested {
            app.reload_requested = false;
            load_into(app).await;
            last_load = std::time::Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Fetch both documents and replace state wholesale. A snapshot failure
/// keeps whatever rows were already loaded and surfaces a notice; an
/// IV-history failure silently degrades IV fields.
async fn load_into(app: &mut App) {
    let (snapshot, iv_history) =
        loader::load_all(loader::snapshot_source(), loader::iv_history_source()).await;

    app.state.load_iv_history(iv_history);
    match snapshot {
        Ok(snapshot) => {
            app.notice = None;
            app.state.load_snapshot(snapshot);
            info!(rows = app.state.rows.len(), "state replaced from snapshot");
        }
        Err(e) => {
            error!(error = %e, "snapshot load failed");
            app.notice = Some(format!("snapshot load failed: {e}"));
        }
    }
    app.refresh();
}
