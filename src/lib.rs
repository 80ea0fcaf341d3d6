//! Connections client library
//!
//! Everything around the pure game logic in `connections_core`: talking to
//! the puzzle backend, reporting results, configuration, the logged-in user
//! and the terminal board.
//!
//! # Architecture
//!
//! - **API**: REST client and wire format for the `/games` endpoints
//! - **Sources**: puzzles from the backend or a local JSON file
//! - **Stats**: fire-and-forget reporting of finished sessions
//! - **Controller**: turns gestures and load results into board updates
//! - **TUI**: ratatui board driven by the controller
//!
//! # Example
//!
//! ```no_run
//! use connections::{GameController, LoadMode, LocalPuzzleSource, LogStatsReporter, Rules};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut controller = GameController::new(
//!     Arc::new(LocalPuzzleSource::new("puzzles.json")),
//!     Arc::new(LogStatsReporter),
//!     LoadMode::Random,
//!     Rules::default(),
//! );
//! controller.start_load(LoadMode::Random);
//! controller.next_load().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod auth;
mod config;
mod controller;
mod source;
mod stats;
mod tui;

// Crate-level exports
pub use api::{
    ApiClient, ApiError, ApiErrorKind, CategoryDto, CreatorDto, PuzzleDto, puzzle_from_value,
    puzzles_from_values,
};
pub use auth::{Authenticator, JwtClaimsDecoder, UserClaims, UserContext};
pub use config::{API_URL_ENV, AUTH_TOKEN_ENV, ClientConfig, ConfigError};
pub use controller::{GameController, Gesture};
pub use source::{HttpPuzzleSource, LocalPuzzleSource, PuzzleSource};
pub use stats::{HttpStatsReporter, LogStatsReporter, StatsReporter, report_in_background};
pub use tui::run_play;

pub use connections_core::{
    BoardState, Category, CategoryColor, CategoryIndex, Creator, GameBoard, LoadMode, LoadTicket,
    OutcomeReport, Puzzle, PuzzleError, PuzzleId, PuzzleSession, Rules, SessionEvent,
    SessionStatus, SubmitOutcome,
};
