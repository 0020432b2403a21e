//! TUI runtime for planzo
//!
//! The UI loop owns the terminal and the [`Session`]. Remote calls, folder
//! reads, timers and sign-in run as tokio tasks and report back over an mpsc
//! channel that is drained once per frame.

use crate::app::background::{self, drain_messages};
use crate::app::input::{handle_key_event, KeyOutcome};
use crate::app::messages::BackgroundMessage;
use crate::config::Config;
use crate::identity;
use crate::llm::RemoteCaller;
use crate::session::{Action, Effect, Session, Viewport};
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI until the user quits
pub async fn run_tui(mut config: Config, folder: Option<PathBuf>) -> Result<()> {
    let settings = config.remote_settings();
    info!(
        model = %settings.model,
        has_api_key = settings.api_key.is_some(),
        "Starting planzo"
    );
    let caller = Arc::new(RemoteCaller::new(settings)?);

    let (tx, rx) = mpsc::channel::<BackgroundMessage>();

    background::spawn_identity_bootstrap(
        identity::provider_for(config.firebase.as_ref(), Config::auth_token()),
        tx.clone(),
    );

    let mut session = Session::new();
    if let Some(folder) = folder {
        run_effects(session.dispatch(Action::OpenFolder(folder)), &caller, &tx);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut session, rx, tx, caller);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_effects(
    effects: Vec<Effect>,
    caller: &Arc<RemoteCaller>,
    tx: &mpsc::Sender<BackgroundMessage>,
) {
    for effect in effects {
        background::execute(effect, caller, tx);
    }
}

/// Main event loop with background message handling
fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    rx: mpsc::Receiver<BackgroundMessage>,
    tx: mpsc::Sender<BackgroundMessage>,
    caller: Arc<RemoteCaller>,
) -> Result<()> {
    let mut tick: usize = 0;

    loop {
        tick = tick.wrapping_add(1);

        // Check for background messages (non-blocking)
        let effects = drain_messages(session, &rx);
        run_effects(effects, &caller, &tx);

        let mut viewport = Viewport::default();
        terminal.draw(|f| viewport = ui::render(f, session, tick))?;
        session.set_viewport(viewport);

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(session, key) {
                    KeyOutcome::Quit => return Ok(()),
                    KeyOutcome::Dispatch(action) => {
                        run_effects(session.dispatch(action), &caller, &tx);
                    }
                    KeyOutcome::Ignore => {}
                }
            }
        }
    }
}
