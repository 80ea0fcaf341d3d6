//! Terminal-side state that is not game state.

use connections_core::{PuzzleSession, SessionEvent};
use tracing::debug;

/// Cursor position and the last message shown to the player.
#[derive(Debug, Default)]
pub struct App {
    cursor: usize,
    message: Option<String>,
}

impl App {
    /// Creates the app with the cursor on the first tile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Board position under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Message from the last submission, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Clears the message, e.g. when a new puzzle starts loading.
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Turns session events into a message.
    pub fn handle_events(&mut self, events: &[SessionEvent], session: Option<&PuzzleSession>) {
        for event in events {
            debug!(?event, "Handling session event");
            self.message = Some(match event {
                SessionEvent::CategoryFound(index) => {
                    let name = session
                        .and_then(|s| s.category_name(*index))
                        .unwrap_or("a category");
                    format!("Found {}!", name)
                }
                SessionEvent::GameWon => "Solved!".to_string(),
                SessionEvent::GameLost => "Out of tries.".to_string(),
            });
        }
    }

    /// Notes a wrong guess.
    pub fn wrong_guess(&mut self) {
        self.message = Some("Not quite.".to_string());
    }
}
