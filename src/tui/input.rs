//! Keyboard mapping for the puzzle board.

use crate::controller::Gesture;
use connections_core::{TILE_COUNT, WORDS_PER_CATEGORY};
use crossterm::event::KeyCode;

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the game.
    Quit,
    /// Move the cursor.
    Move(KeyCode),
    /// Forward a gesture to the controller.
    Play(Gesture),
}

/// Moves the cursor across the 4×4 grid, stopping at the edges.
pub fn move_cursor(cursor: usize, key: KeyCode) -> usize {
    let row = cursor / WORDS_PER_CATEGORY;
    let col = cursor % WORDS_PER_CATEGORY;
    let last = WORDS_PER_CATEGORY - 1;

    let (row, col) = match key {
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(last)),
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(last), col),
        _ => (row, col),
    };
    (row * WORDS_PER_CATEGORY + col).min(TILE_COUNT - 1)
}

/// Maps a key to an action.
///
/// While the keep-playing prompt is open only `y`, `n` and quit are
/// recognised.
pub fn action_for(key: KeyCode, cursor: usize, awaiting_decision: bool) -> Option<Action> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('y') if awaiting_decision => Some(Action::Play(Gesture::KeepPlaying)),
        KeyCode::Char('n') if awaiting_decision => Some(Action::Play(Gesture::StopPlaying)),
        _ if awaiting_decision => None,
        KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down => Some(Action::Move(key)),
        KeyCode::Char(' ') => Some(Action::Play(Gesture::ToggleTile(cursor))),
        KeyCode::Enter => Some(Action::Play(Gesture::Submit)),
        KeyCode::Char('s') => Some(Action::Play(Gesture::Shuffle)),
        KeyCode::Char('n') => Some(Action::Play(Gesture::NewGame)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_within_grid() {
        assert_eq!(move_cursor(0, KeyCode::Right), 1);
        assert_eq!(move_cursor(0, KeyCode::Down), 4);
        assert_eq!(move_cursor(5, KeyCode::Up), 1);
        assert_eq!(move_cursor(5, KeyCode::Left), 4);
    }

    #[test]
    fn test_cursor_stops_at_edges() {
        assert_eq!(move_cursor(0, KeyCode::Left), 0);
        assert_eq!(move_cursor(0, KeyCode::Up), 0);
        assert_eq!(move_cursor(3, KeyCode::Right), 3);
        assert_eq!(move_cursor(15, KeyCode::Down), 15);
    }

    #[test]
    fn test_play_keys() {
        assert_eq!(
            action_for(KeyCode::Char(' '), 7, false),
            Some(Action::Play(Gesture::ToggleTile(7)))
        );
        assert_eq!(
            action_for(KeyCode::Enter, 0, false),
            Some(Action::Play(Gesture::Submit))
        );
        assert_eq!(
            action_for(KeyCode::Char('n'), 0, false),
            Some(Action::Play(Gesture::NewGame))
        );
    }

    #[test]
    fn test_prompt_keys() {
        assert_eq!(
            action_for(KeyCode::Char('y'), 0, true),
            Some(Action::Play(Gesture::KeepPlaying))
        );
        assert_eq!(
            action_for(KeyCode::Char('n'), 0, true),
            Some(Action::Play(Gesture::StopPlaying))
        );
        assert_eq!(action_for(KeyCode::Char(' '), 0, true), None);
        assert_eq!(action_for(KeyCode::Char('q'), 0, true), Some(Action::Quit));
    }
}
