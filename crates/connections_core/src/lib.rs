//! Pure game logic for the Connections word-grouping puzzle.
//!
//! Sixteen words hide four categories of four. A [`PuzzleSession`] tracks
//! one play-through: selection, group checking, wrong tries, winning,
//! losing and keeping on after a loss. A [`GameBoard`] wraps the session
//! with load bookkeeping so that only the newest load is ever shown.
//!
//! Nothing here performs I/O. Fetching puzzles and reporting outcomes are
//! left to the caller, which reads [`OutcomeReport`]s off the session.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod arrange;
mod board;
mod puzzle;
mod session;
mod tile;

pub use arrange::{organize_found, shuffle_all, shuffle_unfound};
pub use board::{BoardState, GameBoard, LoadMode, LoadTicket};
pub use puzzle::{
    CATEGORY_COUNT, Category, CategoryColor, CategoryIndex, Creator, MAX_WORD_LENGTH, Puzzle,
    PuzzleError, PuzzleId, TILE_COUNT, WORDS_PER_CATEGORY,
};
pub use session::{
    DEFAULT_MAX_WRONG_TRIES, OutcomeReport, PuzzleSession, Rules, SessionEvent, SessionStatus,
    SubmitOutcome,
};
pub use tile::{Tile, TileView};
