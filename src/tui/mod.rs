//! Terminal front end for playing puzzles.

mod app;
mod input;
mod ui;

use crate::auth::UserContext;
use crate::controller::{GameController, Gesture};
use anyhow::Result;
use app::App;
use connections_core::SessionStatus;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::Action;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Runs the board until the player quits.
///
/// The controller should already have a load started.
#[instrument(skip_all, fields(player = %user.display_name()))]
pub async fn run_play(mut controller: GameController, user: UserContext) -> Result<()> {
    info!("Starting Connections TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut controller, &user).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.flush_reports().await;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

async fn run_loop(
    terminal: &mut Tui,
    controller: &mut GameController,
    user: &UserContext,
) -> Result<()> {
    let mut app = App::new();

    loop {
        if controller.poll_loads() {
            debug!("Board changed by load");
            app.set_cursor(0);
        }

        terminal.draw(|f| ui::draw(f, controller.board(), &app, user.display_name()))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(key.code, controller, &mut app) {
                    info!("User quit");
                    return Ok(());
                }
            }
        }

        tokio::task::yield_now().await;
    }
}

/// Applies one key press. Returns `false` when the player quits.
fn handle_key(code: KeyCode, controller: &mut GameController, app: &mut App) -> bool {
    let session = controller.board().session();
    let awaiting = session.is_some_and(|s| s.status() == SessionStatus::Lost);
    let wrong_before = session.map(|s| s.wrong_tries());

    match input::action_for(code, app.cursor(), awaiting) {
        Some(Action::Quit) => return false,
        Some(Action::Move(key)) => app.set_cursor(input::move_cursor(app.cursor(), key)),
        Some(Action::Play(gesture)) => {
            if matches!(gesture, Gesture::NewGame | Gesture::StopPlaying) {
                app.clear_message();
            }
            let events = controller.handle(gesture);
            let session = controller.board().session();
            if let (Some(before), Some(after)) = (wrong_before, session.map(|s| s.wrong_tries())) {
                if after > before {
                    app.wrong_guess();
                }
            }
            app.handle_events(&events, session);
        }
        None => {}
    }
    true
}
