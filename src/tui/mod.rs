//! Terminal UI for linesweep

mod app;
mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use linesweep::{ClientConfig, GameEvent, HttpGameClient, SleepPacer, TurnController, UserAction};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use app::{App, KeyOutcome};

/// Run the TUI client
pub async fn run_tui(config: ClientConfig, initial_board: Option<PathBuf>) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,linesweep=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(server_url = %config.server_url(), "Starting linesweep TUI");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (action_tx, action_rx) = mpsc::unbounded_channel();

    let client = HttpGameClient::new(config.server_url());
    let pacer = SleepPacer::from_millis(*config.pace_ms());
    let mut controller = TurnController::from_config(client, pacer, event_tx, &config);
    let controller_task = tokio::spawn({
        let initial_board = initial_board.clone();
        async move { controller.run(action_rx, initial_board).await }
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(initial_board);
    let res = run_app(&mut terminal, &mut app, &mut event_rx, &action_tx).await;

    controller_task.abort();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    info!("Linesweep TUI exited");
    res
}

/// Draws state and forwards key presses until the user quits.
#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
    actions: &mpsc::UnboundedSender<UserAction>,
) -> Result<()> {
    loop {
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        // Keep the poll short so controller events show up promptly
        let key = tokio::task::block_in_place(|| -> io::Result<_> {
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind != KeyEventKind::Release
            {
                return Ok(Some(key.code));
            }
            Ok(None)
        })?;
        let Some(code) = key else {
            continue;
        };

        match app.handle_key(code) {
            KeyOutcome::Quit => {
                info!("User quit");
                return Ok(());
            }
            KeyOutcome::Action(action) => {
                debug!(?action, "Forwarding action");
                if actions.send(action).is_err() {
                    error!("Controller stopped, leaving");
                    return Ok(());
                }
            }
            KeyOutcome::None => {}
        }
    }
}
