//! Board lifecycle: which puzzle to load, which load is current, and what
//! the player sees meanwhile.

use crate::puzzle::{Puzzle, PuzzleId};
use crate::session::{PuzzleSession, Rules, SessionStatus};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// How the next puzzle is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum LoadMode {
    /// Any available puzzle, picked uniformly.
    #[display("random")]
    Random,
    /// One specific puzzle.
    #[display("id {_0}")]
    ById(PuzzleId),
}

/// Identifies one load request. Later tickets supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// What the board is showing.
#[derive(Debug, Clone)]
pub enum BoardState {
    /// A load is in flight.
    Loading,
    /// A session is being played.
    Ready(Box<PuzzleSession>),
    /// The last load failed; the message is shown instead of a board.
    Error(String),
}

/// Owns the current session and guards it against out-of-order loads.
///
/// Only the most recently begun load may install its result; responses to
/// superseded loads are dropped when they arrive.
#[derive(Debug, Clone)]
pub struct GameBoard {
    mode: LoadMode,
    rules: Rules,
    latest: u64,
    settled: bool,
    state: BoardState,
}

impl GameBoard {
    /// Creates a board that has not loaded anything yet.
    #[instrument]
    pub fn new(mode: LoadMode, rules: Rules) -> Self {
        debug!("Creating game board");
        Self {
            mode,
            rules,
            latest: 0,
            settled: false,
            state: BoardState::Loading,
        }
    }

    /// The mode of the most recent load.
    pub fn mode(&self) -> &LoadMode {
        &self.mode
    }

    /// The rules new sessions are created with.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Current board state.
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, BoardState::Loading)
    }

    /// The active session, if one is loaded.
    pub fn session(&self) -> Option<&PuzzleSession> {
        match &self.state {
            BoardState::Ready(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    /// The active session, mutably.
    pub fn session_mut(&mut self) -> Option<&mut PuzzleSession> {
        match &mut self.state {
            BoardState::Ready(session) => Some(session.as_mut()),
            _ => None,
        }
    }

    /// Starts a load in `mode`, superseding any load in flight.
    ///
    /// The current session is discarded; the caller fetches the puzzle and
    /// hands the result to [`GameBoard::finish_load`] with the ticket.
    #[instrument(skip(self))]
    pub fn begin_load(&mut self, mode: LoadMode) -> LoadTicket {
        self.latest += 1;
        self.settled = false;
        self.mode = mode;
        self.state = BoardState::Loading;
        info!(ticket = self.latest, "Load started");
        LoadTicket(self.latest)
    }

    /// Starts a new game with the same mode as the last load.
    pub fn new_game(&mut self) -> LoadTicket {
        let mode = self.mode.clone();
        self.begin_load(mode)
    }

    /// Declines to keep playing after a loss, which starts a new game.
    ///
    /// Returns `None` unless the session is in the lost state.
    pub fn decline_continue(&mut self) -> Option<LoadTicket> {
        match self.session().map(PuzzleSession::status) {
            Some(SessionStatus::Lost) => Some(self.new_game()),
            _ => {
                debug!("Decline only applies after a loss");
                None
            }
        }
    }

    /// Applies the result of a load.
    ///
    /// Returns `false` and changes nothing if `ticket` has been superseded
    /// or its result was already applied.
    #[instrument(skip(self, result, rng), fields(ticket = ticket.0, latest = self.latest))]
    pub fn finish_load<R: Rng>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Puzzle, String>,
        rng: &mut R,
    ) -> bool {
        if ticket.0 != self.latest || self.settled {
            debug!("Discarding stale load result");
            return false;
        }
        self.settled = true;

        self.state = match result {
            Ok(puzzle) => {
                info!(puzzle_id = %puzzle.id(), "Puzzle loaded");
                BoardState::Ready(Box::new(PuzzleSession::start(puzzle, self.rules, rng)))
            }
            Err(message) => {
                warn!(error = %message, "Puzzle load failed");
                BoardState::Error(message)
            }
        };
        true
    }
}
